//! The managed server list and its persisted document form.
//!
//! A [`ConfigDocument`] is always loaded and saved whole. Editing happens on
//! the in-memory value through the operations below.

pub mod clean;
pub mod draft;
pub mod version;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use clean::{CleanConfig, CleanServer, clean_config, clean_config_value};
pub use draft::{CommandKind, ServerDraft};
pub use version::{DocumentVersion, ParseVersionError};

/// Errors raised by document edits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Server '{0}' not found")]
    ServerNotFound(String),
    #[error("Server '{0}' already exists")]
    ServerExists(String),
    #[error("Please fill in required fields: {0}")]
    MissingField(&'static str),
    #[error("A package can only be given for npx, uvx, node or python commands (got '{0}')")]
    PackageNotSupported(String),
}

/// One managed launch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    /// Absent means enabled. Read through [`ServerEntry::is_enabled`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Fields written by other tools, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            enabled: None,
            extra: Map::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Only an explicit `false` disables an entry.
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }

    /// `command arg1 arg2 ...` as shown in listings.
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The whole persisted unit: servers plus save metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: BTreeMap<String, ServerEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<DocumentVersion>,

    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<DateTime<Utc>>,

    #[serde(rename = "modifiedBy", default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.mcp_servers.is_empty()
    }

    pub fn server(&self, name: &str) -> Option<&ServerEntry> {
        self.mcp_servers.get(name)
    }

    /// Insert a server, replacing any entry with the same name.
    /// Returns the replaced entry.
    pub fn upsert(&mut self, name: impl Into<String>, entry: ServerEntry) -> Option<ServerEntry> {
        self.mcp_servers.insert(name.into(), entry)
    }

    /// Insert a server that must not exist yet.
    pub fn add(&mut self, name: impl Into<String>, entry: ServerEntry) -> Result<(), DocumentError> {
        let name = name.into();
        if self.mcp_servers.contains_key(&name) {
            return Err(DocumentError::ServerExists(name));
        }
        self.mcp_servers.insert(name, entry);
        Ok(())
    }

    /// Move `old` to `new` with a replacement entry (delete + insert).
    pub fn rename(&mut self, old: &str, new: &str, entry: ServerEntry) -> Result<(), DocumentError> {
        if !self.mcp_servers.contains_key(old) {
            return Err(DocumentError::ServerNotFound(old.to_string()));
        }
        if old != new && self.mcp_servers.contains_key(new) {
            return Err(DocumentError::ServerExists(new.to_string()));
        }
        self.mcp_servers.remove(old);
        self.mcp_servers.insert(new.to_string(), entry);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<ServerEntry, DocumentError> {
        self.mcp_servers
            .remove(name)
            .ok_or_else(|| DocumentError::ServerNotFound(name.to_string()))
    }

    /// Flip a server between enabled and disabled, storing an explicit flag.
    /// Returns the new state.
    pub fn toggle(&mut self, name: &str) -> Result<bool, DocumentError> {
        let entry = self
            .mcp_servers
            .get_mut(name)
            .ok_or_else(|| DocumentError::ServerNotFound(name.to_string()))?;
        let enabled = !entry.is_enabled();
        entry.enabled = Some(enabled);
        Ok(enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.mcp_servers
            .values()
            .filter(|entry| entry.is_enabled())
            .count()
    }

    /// Stamp save metadata: bump the version, record time and device.
    /// Returns the new version.
    pub fn stamp(&mut self, device: &str, now: DateTime<Utc>) -> DocumentVersion {
        let version = DocumentVersion::advance(self.version);
        self.version = Some(version);
        self.last_modified = Some(now);
        self.modified_by = Some(device.to_string());
        version
    }
}
