#![allow(dead_code)]

use std::path::Path;

use mcpilot_core::config::TargetPaths;
use mcpilot_core::document::{ConfigDocument, ServerEntry};

/// Document with one enabled, one implicitly enabled and one disabled server.
pub fn sample_document() -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    doc.upsert(
        "filesystem",
        ServerEntry::new("npx")
            .with_args(["-y", "@modelcontextprotocol/server-filesystem", "/tmp"])
            .with_enabled(true),
    );
    doc.upsert(
        "fetch",
        ServerEntry::new("uvx")
            .with_args(["mcp-server-fetch"])
            .with_env("USER_AGENT", "mcpilot"),
    );
    doc.upsert(
        "disabled",
        ServerEntry::new("node").with_enabled(false),
    );
    doc
}

/// Target paths rooted under `root`, one subdirectory per target.
pub fn paths_under(root: &Path) -> TargetPaths {
    TargetPaths {
        code: root.join("code").join(".claude.json"),
        desktop: root.join("desktop").join("claude_desktop_config.json"),
        cursor: root.join("cursor").join("mcp.json"),
        claude_ide_cursor: root.join("ide").join("mcp.json"),
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}
