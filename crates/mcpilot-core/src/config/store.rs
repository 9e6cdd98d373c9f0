//! Client-side persisted state: `client.toml` settings and the working copy
//! of the document (`working.json`).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::paths::TargetPathOverrides;
use super::settings::DEFAULT_MAX_BACKUPS;
use crate::document::ConfigDocument;
use crate::helper::DEFAULT_HELPER_URL;
use crate::remote::gist::DEFAULT_FILE_NAME;

const SETTINGS_FILE: &str = "client.toml";
const WORKING_COPY_FILE: &str = "working.json";

/// Settings of the store client (what the browser UI keeps in local storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub gist_id: String,
    pub github_token: String,
    pub file_name: String,
    pub helper_url: String,
    pub max_backups: i64,
    /// Last hostname reported by the helper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub paths: TargetPathOverrides,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            gist_id: String::new(),
            github_token: String::new(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            helper_url: DEFAULT_HELPER_URL.to_string(),
            max_backups: DEFAULT_MAX_BACKUPS,
            device_name: None,
            paths: TargetPathOverrides::default(),
        }
    }
}

impl ClientSettings {
    pub fn has_credentials(&self) -> bool {
        !self.gist_id.trim().is_empty() && !self.github_token.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ClientStore {
    dir: PathBuf,
}

impl ClientStore {
    pub fn from_default_dir() -> anyhow::Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("mcpilot");
        Ok(Self::from_dir(dir))
    }

    pub fn from_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn working_copy_path(&self) -> PathBuf {
        self.dir.join(WORKING_COPY_FILE)
    }

    pub fn load_settings(&self) -> anyhow::Result<ClientSettings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(ClientSettings::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save_settings(&self, settings: &ClientSettings) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        self.write(&self.settings_path(), content.as_bytes())
    }

    /// The working copy, or an empty document if none was saved yet.
    pub fn load_working_copy(&self) -> anyhow::Result<ConfigDocument> {
        let path = self.working_copy_path();
        if !path.exists() {
            return Ok(ConfigDocument::new());
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("Failed to read working copy: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse working copy: {}", path.display()))
    }

    pub fn save_working_copy(&self, document: &ConfigDocument) -> anyhow::Result<()> {
        let bytes =
            serde_json::to_vec_pretty(document).context("Failed to serialize working copy")?;
        self.write(&self.working_copy_path(), &bytes)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create config directory: {}", self.dir.display())
        })?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(())
    }
}
