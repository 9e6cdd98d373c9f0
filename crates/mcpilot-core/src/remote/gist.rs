//! GitHub Gist backed [`RemoteStore`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{RemoteError, RemoteSnapshot, RemoteStore};
use crate::document::ConfigDocument;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_FILE_NAME: &str = "mcp.txt";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct Gist {
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    raw_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GistClient {
    http: reqwest::Client,
    api_base: String,
    gist_id: String,
    token: String,
    file_name: String,
}

impl GistClient {
    pub fn new(gist_id: impl Into<String>, token: impl Into<String>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mcpilot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            gist_id: gist_id.into().trim().to_string(),
            token: token.into().trim().to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    /// Point the client at another API root (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        if !file_name.trim().is_empty() {
            self.file_name = file_name;
        }
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn gist_url(&self) -> Result<Url, RemoteError> {
        if self.gist_id.is_empty() || self.token.is_empty() {
            return Err(RemoteError::MissingCredentials);
        }
        let url = format!(
            "{}/gists/{}",
            self.api_base.trim_end_matches('/'),
            self.gist_id
        );
        Ok(Url::parse(&url)?)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
    }

    async fn fetch_raw(&self, raw_url: &str) -> Result<String, RemoteError> {
        tracing::debug!(url = raw_url, "fetching truncated gist file");
        let response = self.authorized(self.http.get(raw_url)).send().await?;
        let response = check_status(response)?;
        Ok(response.text().await?)
    }
}

fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized,
        StatusCode::NOT_FOUND => RemoteError::NotFound,
        other => RemoteError::Http {
            status: other.as_u16(),
            reason: other.canonical_reason().unwrap_or("Unknown").to_string(),
        },
    })
}

impl RemoteStore for GistClient {
    async fn fetch(&self) -> Result<RemoteSnapshot, RemoteError> {
        let mut url = self.gist_url()?;
        url.query_pairs_mut()
            .append_pair("t", &Utc::now().timestamp_millis().to_string());

        tracing::debug!(gist = %self.gist_id, "loading document from gist");
        let response = self.authorized(self.http.get(url)).send().await?;
        let gist: Gist = check_status(response)?.json().await?;

        let file = gist
            .files
            .get(&self.file_name)
            .ok_or_else(|| RemoteError::MissingFile(self.file_name.clone()))?;

        let content = match (&file.raw_url, file.truncated) {
            (Some(raw_url), true) => self.fetch_raw(raw_url).await?,
            _ => file.content.clone().unwrap_or_default(),
        };

        let document: ConfigDocument = serde_json::from_str(&content)?;
        tracing::info!(
            servers = document.mcp_servers.len(),
            "loaded document from gist"
        );

        Ok(RemoteSnapshot {
            document,
            updated_at: gist.updated_at,
        })
    }

    async fn store(&self, document: &ConfigDocument) -> Result<(), RemoteError> {
        let url = self.gist_url()?;
        let content = serde_json::to_string_pretty(document)?;
        let body = json!({
            "files": {
                self.file_name.as_str(): { "content": content }
            }
        });

        let response = self
            .authorized(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        check_status(response)?;

        tracing::info!(gist = %self.gist_id, "saved document to gist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_fail_before_any_request() {
        let client = GistClient::new("", "token").unwrap();
        assert!(matches!(
            client.gist_url(),
            Err(RemoteError::MissingCredentials)
        ));

        let client = GistClient::new("abc", "  ").unwrap();
        assert!(matches!(
            client.gist_url(),
            Err(RemoteError::MissingCredentials)
        ));
    }

    #[test]
    fn gist_url_tolerates_trailing_slash() {
        let client = GistClient::new("abc123", "t")
            .unwrap()
            .with_api_base("http://127.0.0.1:9999/");
        assert_eq!(
            client.gist_url().unwrap().as_str(),
            "http://127.0.0.1:9999/gists/abc123"
        );
    }

    #[test]
    fn blank_file_name_keeps_default() {
        let client = GistClient::new("a", "t").unwrap().with_file_name(" ");
        assert_eq!(client.file_name(), DEFAULT_FILE_NAME);
    }
}
