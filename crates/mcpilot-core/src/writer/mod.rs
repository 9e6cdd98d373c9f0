//! Multi-target config writer with backup rotation.
//!
//! Each target is handled on its own: create the parent directory, back up
//! the existing file, prune old backups, then overwrite. A failure stops the
//! remaining steps for that target only; the live file is never replaced if
//! its backup could not be taken. Targets resolving to the same file share
//! one backup and one write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backup::{BackupOutcome, create_backup};
use crate::config::{HelperSettings, TargetPaths};
use crate::document::CleanConfig;
use crate::types::{TargetId, TargetSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Success,
    Error,
}

/// Outcome of writing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResult {
    /// Human label, e.g. `Claude Desktop`.
    pub target: String,
    pub status: TargetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetResult {
    pub fn success(target: TargetId, path: PathBuf, backup: BackupOutcome) -> Self {
        Self {
            target: target.label().to_string(),
            status: TargetStatus::Success,
            path: Some(path),
            backup: Some(backup),
            error: None,
        }
    }

    pub fn failure(target: TargetId, error: impl Into<String>) -> Self {
        Self {
            target: target.label().to_string(),
            status: TargetStatus::Error,
            path: None,
            backup: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TargetStatus::Success
    }

    pub fn backup_created(&self) -> bool {
        self.backup.as_ref().is_some_and(|b| b.backup)
    }
}

/// Writes clean configs to resolved target paths.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    paths: TargetPaths,
    max_backups: i64,
}

impl ConfigWriter {
    pub fn new(paths: TargetPaths, max_backups: i64) -> Self {
        Self { paths, max_backups }
    }

    pub fn from_settings(settings: &HelperSettings) -> Self {
        Self::new(settings.paths.clone(), settings.max_backups)
    }

    pub fn path_for(&self, target: TargetId) -> &Path {
        self.paths.get(target)
    }

    pub fn write(&self, config: &CleanConfig, selector: &TargetSelector) -> Vec<TargetResult> {
        self.write_at(config, selector, Utc::now())
    }

    /// Write every target addressed by `selector`, using `now` for backup names.
    /// Unknown selectors write nothing.
    pub fn write_at(
        &self,
        config: &CleanConfig,
        selector: &TargetSelector,
        now: DateTime<Utc>,
    ) -> Vec<TargetResult> {
        let targets = selector.targets();
        if targets.is_empty() {
            tracing::warn!(selector = %selector, "unknown save target; nothing written");
            return Vec::new();
        }

        let content = match config.to_pretty_json() {
            Ok(content) => content,
            Err(err) => {
                let message = format!("Failed to serialize config: {err}");
                return targets
                    .into_iter()
                    .map(|target| TargetResult::failure(target, message.clone()))
                    .collect();
            }
        };

        // Targets may share a file (cursor and claudeIdeCursor by default).
        // Each file is backed up and written once; later targets reuse the outcome.
        let mut written: Vec<(&Path, Result<BackupOutcome, String>)> = Vec::new();
        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let path = self.paths.get(target);
            let outcome = match written.iter().find(|(seen, _)| *seen == path) {
                Some((_, outcome)) => {
                    tracing::debug!(
                        client = %target,
                        path = %path.display(),
                        "file already written in this save"
                    );
                    outcome.clone()
                }
                None => {
                    let outcome = self
                        .write_target(path, content.as_bytes(), now)
                        .map_err(|err| format!("{err:#}"));
                    written.push((path, outcome.clone()));
                    outcome
                }
            };

            results.push(match outcome {
                Ok(backup) => {
                    tracing::info!(client = %target, path = %path.display(), "config saved");
                    TargetResult::success(target, path.to_path_buf(), backup)
                }
                Err(error) => {
                    tracing::warn!(client = %target, %error, "config save failed");
                    TargetResult::failure(target, error)
                }
            });
        }
        results
    }

    fn write_target(
        &self,
        path: &Path,
        content: &[u8],
        now: DateTime<Utc>,
    ) -> anyhow::Result<BackupOutcome> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let backup = create_backup(path, now, self.max_backups)?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(backup)
    }
}
