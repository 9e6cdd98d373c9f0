mod support;

use mcpilot_core::document::clean_config;
use mcpilot_core::export::{export_clean_config, export_names};
use mcpilot_core::types::TargetSelector;
use tempfile::TempDir;

use support::{read_json, sample_document};

#[test]
fn export_names_follow_download_conventions() {
    assert_eq!(
        export_names(&TargetSelector::parse("desktop")),
        vec!["claude_desktop_config.json"]
    );
    assert_eq!(export_names(&TargetSelector::parse("code")), vec!["claude.json"]);
    assert_eq!(
        export_names(&TargetSelector::parse("claudeIdeCursor")),
        vec!["mcp.json"]
    );
    assert_eq!(
        export_names(&TargetSelector::parse("both")),
        vec!["claude_desktop_config.json", "claude.json"]
    );
    assert_eq!(
        export_names(&TargetSelector::parse("all")),
        vec!["claude_desktop_config.json", "claude.json", "mcp.json"]
    );
}

#[test]
fn export_writes_clean_config_into_directory() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let clean = clean_config(&sample_document());

    let written = export_clean_config(&clean, &TargetSelector::parse("all"), &out).unwrap();

    assert_eq!(written.len(), 3);
    for path in &written {
        assert_eq!(read_json(path), serde_json::to_value(&clean).unwrap());
    }
}

#[test]
fn export_rejects_unknown_selector() {
    let temp = TempDir::new().unwrap();
    let clean = clean_config(&sample_document());

    let err = export_clean_config(&clean, &TargetSelector::parse("nope"), temp.path()).unwrap_err();

    assert!(err.to_string().contains("Unknown target"));
}
