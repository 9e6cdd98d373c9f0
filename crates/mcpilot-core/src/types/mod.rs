//! Shared core types used across configuration, writer and client layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host operating system, as far as default config locations care.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    /// Anything else; resolves paths like Linux.
    Other(String),
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Parse an OS identifier. Accepts both Rust (`windows`, `macos`) and
    /// Node-style (`win32`, `darwin`) names.
    pub fn from_os(os: &str) -> Self {
        match os.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" => Platform::Windows,
            "macos" | "darwin" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Node-style `os.platform()` identifier reported to the browser UI.
    pub fn node_platform(&self) -> &str {
        match self {
            Platform::Windows => "win32",
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Other(name) => name,
        }
    }

    /// Node-style `os.type()` name.
    pub fn os_type(&self) -> &str {
        match self {
            Platform::Windows => "Windows_NT",
            Platform::MacOs => "Darwin",
            Platform::Linux => "Linux",
            Platform::Other(name) => name,
        }
    }
}

/// A desktop-application config location the writer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetId {
    /// Claude Code CLI (`~/.claude.json`)
    Code,
    /// Claude Desktop
    Desktop,
    /// Cursor
    Cursor,
    /// Claude IDE integration inside Cursor
    ClaudeIdeCursor,
}

impl TargetId {
    /// Every known target, in write order.
    pub const ALL: [TargetId; 4] = [
        TargetId::Code,
        TargetId::Desktop,
        TargetId::Cursor,
        TargetId::ClaudeIdeCursor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetId::Code => "code",
            TargetId::Desktop => "desktop",
            TargetId::Cursor => "cursor",
            TargetId::ClaudeIdeCursor => "claudeIdeCursor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        TargetId::ALL
            .into_iter()
            .find(|target| target.as_str() == value)
    }

    /// Human-readable label used in save results.
    pub fn label(self) -> &'static str {
        match self {
            TargetId::Code => "Claude Code CLI",
            TargetId::Desktop => "Claude Desktop",
            TargetId::Cursor => "Cursor",
            TargetId::ClaudeIdeCursor => "Claude IDE Cursor",
        }
    }

    /// File name used when the config is exported instead of written in place.
    pub fn download_name(self) -> &'static str {
        match self {
            TargetId::Code => "claude.json",
            TargetId::Desktop => "claude_desktop_config.json",
            TargetId::Cursor | TargetId::ClaudeIdeCursor => "mcp.json",
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which targets a save request addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    Single(TargetId),
    /// Claude Code + Claude Desktop
    Both,
    /// Every known target
    All,
    /// Unrecognised selector; addresses nothing.
    Unknown(String),
}

impl TargetSelector {
    /// Parse a selector. Never fails: unknown names map to [`TargetSelector::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value {
            "both" => TargetSelector::Both,
            "all" => TargetSelector::All,
            other => match TargetId::parse(other) {
                Some(target) => TargetSelector::Single(target),
                None => TargetSelector::Unknown(other.to_string()),
            },
        }
    }

    pub fn targets(&self) -> Vec<TargetId> {
        match self {
            TargetSelector::Single(target) => vec![*target],
            TargetSelector::Both => vec![TargetId::Code, TargetId::Desktop],
            TargetSelector::All => TargetId::ALL.to_vec(),
            TargetSelector::Unknown(_) => Vec::new(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TargetSelector::Unknown(_))
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::Single(target) => f.write_str(target.as_str()),
            TargetSelector::Both => f.write_str("both"),
            TargetSelector::All => f.write_str("all"),
            TargetSelector::Unknown(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_accepts_node_and_rust_names() {
        assert_eq!(Platform::from_os("win32"), Platform::Windows);
        assert_eq!(Platform::from_os("windows"), Platform::Windows);
        assert_eq!(Platform::from_os("darwin"), Platform::MacOs);
        assert_eq!(Platform::from_os("macos"), Platform::MacOs);
        assert_eq!(Platform::from_os("linux"), Platform::Linux);
        assert_eq!(
            Platform::from_os("freebsd"),
            Platform::Other("freebsd".to_string())
        );
    }

    #[test]
    fn selector_expands_aggregates() {
        assert_eq!(
            TargetSelector::parse("both").targets(),
            vec![TargetId::Code, TargetId::Desktop]
        );
        assert_eq!(TargetSelector::parse("all").targets().len(), 4);
        assert_eq!(
            TargetSelector::parse("claudeIdeCursor").targets(),
            vec![TargetId::ClaudeIdeCursor]
        );
    }

    #[test]
    fn unknown_selector_addresses_nothing() {
        let selector = TargetSelector::parse("vscode");
        assert!(!selector.is_known());
        assert!(selector.targets().is_empty());
    }

    #[test]
    fn target_id_serializes_camel_case() {
        let value = serde_json::to_value(TargetId::ClaudeIdeCursor).unwrap();
        assert_eq!(value, serde_json::json!("claudeIdeCursor"));
    }
}
