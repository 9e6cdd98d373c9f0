//! Target path resolution helpers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{Platform, TargetId};

/// Default config file location for a target on the given platform.
pub fn default_target_path(target: TargetId, platform: &Platform, home: &Path) -> PathBuf {
    match target {
        TargetId::Code => home.join(".claude.json"),
        TargetId::Desktop => match platform {
            Platform::Windows => home
                .join("AppData")
                .join("Roaming")
                .join("Claude")
                .join("claude_desktop_config.json"),
            Platform::MacOs => home
                .join("Library")
                .join("Application Support")
                .join("Claude")
                .join("claude_desktop_config.json"),
            Platform::Linux | Platform::Other(_) => home
                .join(".config")
                .join("Claude")
                .join("claude_desktop_config.json"),
        },
        TargetId::Cursor | TargetId::ClaudeIdeCursor => home.join(".cursor").join("mcp.json"),
    }
}

/// One resolved path per known target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPaths {
    pub code: PathBuf,
    pub desktop: PathBuf,
    pub cursor: PathBuf,
    pub claude_ide_cursor: PathBuf,
}

impl TargetPaths {
    pub fn defaults(platform: &Platform, home: &Path) -> Self {
        Self {
            code: default_target_path(TargetId::Code, platform, home),
            desktop: default_target_path(TargetId::Desktop, platform, home),
            cursor: default_target_path(TargetId::Cursor, platform, home),
            claude_ide_cursor: default_target_path(TargetId::ClaudeIdeCursor, platform, home),
        }
    }

    pub fn get(&self, target: TargetId) -> &Path {
        match target {
            TargetId::Code => &self.code,
            TargetId::Desktop => &self.desktop,
            TargetId::Cursor => &self.cursor,
            TargetId::ClaudeIdeCursor => &self.claude_ide_cursor,
        }
    }

    /// New value with every provided, non-empty override applied.
    pub fn with_overrides(&self, overrides: &TargetPathOverrides) -> Self {
        let mut merged = self.clone();
        for target in TargetId::ALL {
            if let Some(path) = overrides.get(target) {
                *merged.slot_mut(target) = path.to_path_buf();
            }
        }
        merged
    }

    fn slot_mut(&mut self, target: TargetId) -> &mut PathBuf {
        match target {
            TargetId::Code => &mut self.code,
            TargetId::Desktop => &mut self.desktop,
            TargetId::Cursor => &mut self.cursor,
            TargetId::ClaudeIdeCursor => &mut self.claude_ide_cursor,
        }
    }
}

/// Optional per-target path overrides.
///
/// Accepts the legacy `claudeCode` / `claudeDesktop` keys on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPathOverrides {
    #[serde(default, alias = "claudeCode", skip_serializing_if = "Option::is_none")]
    pub code: Option<PathBuf>,
    #[serde(default, alias = "claudeDesktop", skip_serializing_if = "Option::is_none")]
    pub desktop: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_ide_cursor: Option<PathBuf>,
}

impl TargetPathOverrides {
    /// The override for a target, ignoring empty values.
    pub fn get(&self, target: TargetId) -> Option<&Path> {
        let value = match target {
            TargetId::Code => &self.code,
            TargetId::Desktop => &self.desktop,
            TargetId::Cursor => &self.cursor,
            TargetId::ClaudeIdeCursor => &self.claude_ide_cursor,
        };
        value
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn set(&mut self, target: TargetId, path: Option<PathBuf>) {
        let slot = match target {
            TargetId::Code => &mut self.code,
            TargetId::Desktop => &mut self.desktop,
            TargetId::Cursor => &mut self.cursor,
            TargetId::ClaudeIdeCursor => &mut self.claude_ide_cursor,
        };
        *slot = path;
    }

    /// Copy with empty values removed.
    pub fn non_empty(&self) -> Self {
        let mut out = Self::default();
        for target in TargetId::ALL {
            out.set(target, self.get(target).map(Path::to_path_buf));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        TargetId::ALL
            .into_iter()
            .all(|target| self.get(target).is_none())
    }
}
