//! Editable form of a server entry.
//!
//! Mirrors the add/edit form: a launcher command (`npx`, `uvx`, `node`,
//! `python`) takes a package or script that becomes the first argument, the
//! remaining arguments are free-form lines, and env vars are key/value rows.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{DocumentError, ServerEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Npx,
    Uvx,
    Node,
    Python,
    Docker,
    Custom,
}

impl CommandKind {
    pub fn infer(command: &str) -> Self {
        match command.trim() {
            "npx" => CommandKind::Npx,
            "uvx" => CommandKind::Uvx,
            "node" => CommandKind::Node,
            "python" | "python3" => CommandKind::Python,
            "docker" => CommandKind::Docker,
            _ => CommandKind::Custom,
        }
    }

    /// Whether the first argument is a package/script slot.
    pub fn takes_package(self) -> bool {
        matches!(
            self,
            CommandKind::Npx | CommandKind::Uvx | CommandKind::Node | CommandKind::Python
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerDraft {
    pub name: String,
    pub command: String,
    pub package: Option<String>,
    /// One argument per line; blank lines are ignored.
    pub args: Vec<String>,
    /// Key/value rows; rows with a blank key are ignored.
    pub env: Vec<(String, String)>,
    pub enabled: bool,
    /// Unmanaged fields carried over from an existing entry.
    pub extra: Map<String, Value>,
}

impl ServerDraft {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Populate a draft from an existing entry, splitting the package slot
    /// back out of the arguments.
    pub fn from_entry(name: &str, entry: &ServerEntry) -> Self {
        let kind = CommandKind::infer(&entry.command);
        let (package, args) = match entry.args.split_first() {
            Some((first, rest)) if kind.takes_package() => (Some(first.clone()), rest.to_vec()),
            _ => (None, entry.args.clone()),
        };

        Self {
            name: name.to_string(),
            command: entry.command.clone(),
            package,
            args,
            env: entry
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            enabled: entry.is_enabled(),
            extra: entry.extra.clone(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        CommandKind::infer(&self.command)
    }

    /// Validate and build the entry. Returns the trimmed name with it.
    pub fn build(&self) -> Result<(String, ServerEntry), DocumentError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DocumentError::MissingField("name"));
        }
        let command = self.command.trim();
        if command.is_empty() {
            return Err(DocumentError::MissingField("command"));
        }

        let package = self
            .package
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let mut args = Vec::new();
        if let Some(package) = package {
            if !self.kind().takes_package() {
                return Err(DocumentError::PackageNotSupported(command.to_string()));
            }
            args.push(package.to_string());
        }
        args.extend(
            self.args
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );

        let env: BTreeMap<String, String> = self
            .env
            .iter()
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, _)| !k.is_empty())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let entry = ServerEntry {
            command: command.to_string(),
            args,
            env,
            enabled: Some(self.enabled),
            extra: self.extra.clone(),
        };

        Ok((name.to_string(), entry))
    }
}
