//! HTTP client for the local config writer ("helper").
//!
//! An unreachable helper is not a failure for callers: it only means direct
//! saves are unavailable and exports fall back to files.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::api::{SaveConfigRequest, SaveConfigResponse, SettingsResponse, StatusReport};
use crate::config::{HelperSettings, SettingsUpdate};
use crate::document::ConfigDocument;
use crate::host::HostInfo;
use crate::types::TargetSelector;
use crate::writer::TargetResult;

pub const DEFAULT_HELPER_URL: &str = "http://localhost:8080";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("local helper is not reachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("local helper answered HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("local helper rejected the request: {0}")]
    Rejected(String),
    #[error("unexpected response from local helper: {0}")]
    InvalidResponse(String),
}

impl HelperError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, HelperError::Unreachable { .. })
    }
}

#[derive(Debug, Clone)]
pub struct HelperClient {
    http: reqwest::Client,
    base_url: String,
}

impl HelperClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mcpilot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| anyhow::anyhow!("Failed to build HTTP client: {err}"))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Result<StatusReport, HelperError> {
        self.get("/api/status").await
    }

    /// `true` only when the helper answers and advertises `direct-save`.
    pub async fn supports_direct_save(&self) -> bool {
        match self.status().await {
            Ok(report) => report.supports_direct_save(),
            Err(err) => {
                tracing::warn!(error = %err, "helper status unavailable");
                false
            }
        }
    }

    pub async fn hostname(&self) -> Result<HostInfo, HelperError> {
        self.get("/api/hostname").await
    }

    pub async fn settings(&self) -> Result<HelperSettings, HelperError> {
        self.get("/api/settings").await
    }

    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<HelperSettings, HelperError> {
        let response: SettingsResponse = self.post("/api/settings", update).await?;
        match (response.success, response.settings) {
            (true, Some(settings)) => Ok(settings),
            (_, _) => Err(HelperError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "settings update failed".to_string()),
            )),
        }
    }

    /// Ask the helper to write `document` to the targets named by `selector`.
    pub async fn save_config(
        &self,
        document: &ConfigDocument,
        selector: &TargetSelector,
    ) -> Result<Vec<TargetResult>, HelperError> {
        let request = SaveConfigRequest {
            config: document,
            target: selector.to_string(),
        };
        let response: SaveConfigResponse = self.post("/api/save-config", &request).await?;
        if response.success {
            Ok(response.results.unwrap_or_default())
        } else {
            Err(HelperError::Rejected(
                response
                    .error
                    .unwrap_or_else(|| "save failed".to_string()),
            ))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HelperError> {
        let url = self.url(path);
        tracing::debug!(%url, "helper GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| HelperError::Unreachable { url, source })?;
        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HelperError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "helper POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| HelperError::Unreachable { url, source })?;
        decode(response).await
    }
}

/// Decode a helper response. Error bodies of the form `{success:false, error}`
/// surface their message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HelperError> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| HelperError::InvalidResponse(err.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|value| value.get("error")?.as_str().map(str::to_string))
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
        return Err(HelperError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|err| HelperError::InvalidResponse(err.to_string()))
}
