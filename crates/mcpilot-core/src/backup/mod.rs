//! Timestamped backups of config files before they are overwritten.
//!
//! Backups live in a `backups` directory next to the target and are named
//! `<stem>-<YYYY-MM-DDTHH-MM-SS>.json`, so name order is chronological.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const BACKUP_DIR_NAME: &str = "backups";

/// Whether a backup was taken for a target, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupOutcome {
    pub backup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl BackupOutcome {
    pub fn none() -> Self {
        Self {
            backup: false,
            path: None,
        }
    }

    pub fn created(path: PathBuf) -> Self {
        Self {
            backup: true,
            path: Some(path),
        }
    }
}

/// Second-precision UTC timestamp with `:` and `.` replaced by `-`.
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// File name of the target without a trailing `.json`.
pub fn backup_stem(target: &Path) -> String {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".json") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

pub fn backup_dir(target: &Path) -> PathBuf {
    target
        .parent()
        .map(|parent| parent.join(BACKUP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(BACKUP_DIR_NAME))
}

/// Copy an existing target into its backup directory, then prune old backups.
///
/// Does nothing when the target does not exist. The target itself is never
/// modified here.
pub fn create_backup(
    target: &Path,
    now: DateTime<Utc>,
    max_backups: i64,
) -> anyhow::Result<BackupOutcome> {
    if !target.exists() {
        return Ok(BackupOutcome::none());
    }

    let dir = backup_dir(target);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create backup directory: {}", dir.display()))?;

    let stem = backup_stem(target);
    let backup_path = dir.join(format!("{stem}-{}.json", backup_timestamp(now)));
    std::fs::copy(target, &backup_path).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            target.display(),
            backup_path.display()
        )
    })?;
    tracing::info!(path = %backup_path.display(), "backup created");

    prune_backups(&dir, &stem, max_backups)?;

    Ok(BackupOutcome::created(backup_path))
}

/// Backup file names for `stem`, newest first.
pub fn list_backups(dir: &Path, stem: &str) -> anyhow::Result<Vec<String>> {
    let prefix = format!("{stem}-");
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read backup directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read backup directory: {}", dir.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) && name.ends_with(".json") {
            names.push(name);
        }
    }

    names.sort_unstable_by(|a, b| b.cmp(a));
    Ok(names)
}

/// Delete every backup beyond the newest `max_backups`, oldest first.
///
/// A limit of zero or below keeps nothing. Returns the deleted paths.
pub fn prune_backups(dir: &Path, stem: &str, max_backups: i64) -> anyhow::Result<Vec<PathBuf>> {
    let keep = usize::try_from(max_backups.max(0)).unwrap_or(usize::MAX);
    let names = list_backups(dir, stem)?;

    let mut deleted = Vec::new();
    for name in names.iter().skip(keep).rev() {
        let path = dir.join(name);
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete old backup: {}", path.display()))?;
        tracing::info!(backup = %name, "deleted old backup");
        deleted.push(path);
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_is_sortable_and_colon_free() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        assert_eq!(backup_timestamp(now), "2024-03-09T07-05-02");
    }

    #[test]
    fn stem_strips_only_json_suffix() {
        assert_eq!(backup_stem(Path::new("/h/.claude.json")), ".claude");
        assert_eq!(
            backup_stem(Path::new("/h/claude_desktop_config.json")),
            "claude_desktop_config"
        );
        assert_eq!(backup_stem(Path::new("/h/config.toml")), "config.toml");
    }

    #[test]
    fn backup_dir_is_sibling_of_target() {
        assert_eq!(
            backup_dir(Path::new("/h/.cursor/mcp.json")),
            PathBuf::from("/h/.cursor/backups")
        );
    }
}
