use std::path::{Path, PathBuf};

use mcpilot_core::config::{TargetPathOverrides, TargetPaths, default_target_path};
use mcpilot_core::types::{Platform, TargetId};

const HOME: &str = "/home/user";

#[test]
fn desktop_path_depends_on_platform() {
    let home = Path::new(HOME);
    assert_eq!(
        default_target_path(TargetId::Desktop, &Platform::Windows, home),
        PathBuf::from("/home/user/AppData/Roaming/Claude/claude_desktop_config.json")
    );
    assert_eq!(
        default_target_path(TargetId::Desktop, &Platform::MacOs, home),
        PathBuf::from("/home/user/Library/Application Support/Claude/claude_desktop_config.json")
    );
    assert_eq!(
        default_target_path(TargetId::Desktop, &Platform::Linux, home),
        PathBuf::from("/home/user/.config/Claude/claude_desktop_config.json")
    );
}

#[test]
fn unknown_platform_falls_back_to_linux_layout() {
    let home = Path::new(HOME);
    let other = Platform::from_os("freebsd");
    assert_eq!(
        TargetPaths::defaults(&other, home),
        TargetPaths::defaults(&Platform::Linux, home)
    );
}

#[test]
fn platform_independent_targets() {
    for platform in [Platform::Windows, Platform::MacOs, Platform::Linux] {
        let paths = TargetPaths::defaults(&platform, Path::new(HOME));
        assert_eq!(paths.code, PathBuf::from("/home/user/.claude.json"));
        assert_eq!(paths.cursor, PathBuf::from("/home/user/.cursor/mcp.json"));
        assert_eq!(paths.claude_ide_cursor, paths.cursor);
    }
}

#[test]
fn override_touches_only_its_target() {
    let defaults = TargetPaths::defaults(&Platform::Linux, Path::new(HOME));
    let mut overrides = TargetPathOverrides::default();
    overrides.set(TargetId::Cursor, Some(PathBuf::from("/etc/cursor.json")));

    let merged = defaults.with_overrides(&overrides);

    assert_eq!(merged.get(TargetId::Cursor), Path::new("/etc/cursor.json"));
    assert_eq!(merged.code, defaults.code);
    assert_eq!(merged.desktop, defaults.desktop);
    assert_eq!(merged.claude_ide_cursor, defaults.claude_ide_cursor);
}

#[test]
fn empty_override_is_ignored() {
    let mut overrides = TargetPathOverrides::default();
    overrides.set(TargetId::Code, Some(PathBuf::new()));

    assert!(overrides.get(TargetId::Code).is_none());
    assert!(overrides.is_empty());
    assert_eq!(overrides.non_empty(), TargetPathOverrides::default());
}
