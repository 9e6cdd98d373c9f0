//! Clean (publishable) form of a document.
//!
//! Desktop clients expect nothing but `mcpServers` with `command`, `args` and
//! an optional `env` per server. Disabled servers and all management metadata
//! are left out.
//!
//! Field values are carried as raw JSON so documents written by other tools
//! pass through unchanged, whatever their shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ConfigDocument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, CleanServer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Value>,
    #[serde(default = "no_args")]
    pub args: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Value>,
}

fn no_args() -> Value {
    Value::Array(Vec::new())
}

impl CleanConfig {
    /// Pretty-printed JSON (2-space indent) as written to target files.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Derive the clean config from a document. Pure; never fails.
pub fn clean_config(document: &ConfigDocument) -> CleanConfig {
    let mcp_servers = document
        .mcp_servers
        .iter()
        .filter(|(_, entry)| entry.is_enabled())
        .map(|(name, entry)| {
            let env = (!entry.env.is_empty()).then(|| {
                Value::Object(
                    entry
                        .env
                        .iter()
                        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                        .collect::<Map<_, _>>(),
                )
            });
            (
                name.clone(),
                CleanServer {
                    command: Some(Value::String(entry.command.clone())),
                    args: Value::Array(entry.args.iter().cloned().map(Value::String).collect()),
                    env,
                },
            )
        })
        .collect();

    CleanConfig { mcp_servers }
}

/// Derive the clean config from an untyped document.
///
/// Only an explicit `"enabled": false` drops a server. Whatever `command`,
/// `args` and `env` an entry carries are copied as-is: a missing or falsy
/// `args` becomes `[]` and an `env` without entries is left out. Entries that
/// are not objects have nothing to publish and are skipped.
pub fn clean_config_value(document: &Value) -> CleanConfig {
    let Some(servers) = document.get("mcpServers").and_then(Value::as_object) else {
        return CleanConfig::default();
    };

    let mcp_servers = servers
        .iter()
        .filter_map(|(name, server)| {
            let Some(fields) = server.as_object() else {
                tracing::debug!(server = %name, "skipping server entry that is not an object");
                return None;
            };
            if fields.get("enabled") == Some(&Value::Bool(false)) {
                return None;
            }
            let server = CleanServer {
                command: fields.get("command").cloned(),
                args: fields
                    .get("args")
                    .filter(|args| is_truthy(args))
                    .cloned()
                    .unwrap_or_else(no_args),
                env: fields.get("env").filter(|env| has_entries(env)).cloned(),
            };
            Some((name.clone(), server))
        })
        .collect();

    CleanConfig { mcp_servers }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn has_entries(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => false,
    }
}
