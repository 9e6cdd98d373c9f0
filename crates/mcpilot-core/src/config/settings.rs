//! Runtime settings of the local config writer.
//!
//! Settings are an owned value. An update never mutates in place: it produces
//! a new merged value that callers swap in.

use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::paths::{TargetPathOverrides, TargetPaths};
use crate::types::Platform;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BACKUPS: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings update: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperSettings {
    pub port: u16,
    /// Backups kept per target. Non-positive values keep none.
    pub max_backups: i64,
    pub paths: TargetPaths,
}

impl HelperSettings {
    pub fn new(port: u16, max_backups: i64, paths: TargetPaths) -> Self {
        Self {
            port,
            max_backups,
            paths,
        }
    }

    /// Defaults for a platform and home directory.
    pub fn defaults(platform: &Platform, home: &Path) -> Self {
        Self::new(
            DEFAULT_PORT,
            DEFAULT_MAX_BACKUPS,
            TargetPaths::defaults(platform, home),
        )
    }

    /// New settings with the provided, non-empty fields of `update` applied.
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        let paths = match &update.paths {
            Some(overrides) => self.paths.with_overrides(overrides),
            None => self.paths.clone(),
        };
        Self {
            port: self.port,
            max_backups: update.max_backups.unwrap_or(self.max_backups),
            paths,
        }
    }
}

/// Body of a settings update. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<TargetPathOverrides>,

    #[serde(
        default,
        deserialize_with = "deserialize_max_backups",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_backups: Option<i64>,
}

impl SettingsUpdate {
    pub fn parse(body: &[u8]) -> Result<Self, SettingsError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Accepts an integer or an integer-valued string; `null` counts as absent.
fn deserialize_max_backups<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("maxBackups must be an integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("maxBackups must be an integer, got '{s}'"))),
        other => Err(de::Error::custom(format!(
            "maxBackups must be an integer, got {other}"
        ))),
    }
}
