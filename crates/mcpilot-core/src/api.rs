//! Wire types shared by the helper server and its client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{HelperSettings, TargetPaths};
use crate::writer::TargetResult;

/// Capability advertised by helpers that can write configs in place.
pub const DIRECT_SAVE_CAPABILITY: &str = "direct-save";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: String,
    pub version: String,
    pub capabilities: Vec<String>,
    pub paths: TargetPaths,
    pub port: u16,
    pub max_backups: i64,
}

impl StatusReport {
    pub fn running(settings: &HelperSettings) -> Self {
        Self {
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: vec![DIRECT_SAVE_CAPABILITY.to_string()],
            paths: settings.paths.clone(),
            port: settings.port,
            max_backups: settings.max_backups,
        }
    }

    pub fn supports_direct_save(&self) -> bool {
        self.capabilities
            .iter()
            .any(|capability| capability == DIRECT_SAVE_CAPABILITY)
    }
}

/// Body of `POST /api/save-config`. The helper derives the clean form itself,
/// so disabled servers may be sent.
///
/// The helper reads `config` untyped: entries of any shape are accepted and
/// published as they are. Clients send a [`ConfigDocument`](crate::document::ConfigDocument).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveConfigRequest<C = Value> {
    pub config: C,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfigResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TargetResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveConfigResponse {
    pub fn success(results: Vec<TargetResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<HelperSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SettingsResponse {
    pub fn success(settings: HelperSettings) -> Self {
        Self {
            success: true,
            settings: Some(settings),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            settings: None,
            error: Some(error.into()),
        }
    }
}
