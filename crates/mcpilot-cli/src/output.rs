//! Human-readable rendering for command results.

use std::collections::BTreeSet;

use console::style;

use mcpilot_core::config::ClientSettings;
use mcpilot_core::document::ConfigDocument;
use mcpilot_core::types::TargetId;
use mcpilot_core::writer::TargetResult;

/// Keep the last four characters of a token visible.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return "(not set)".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

pub fn print_servers(document: &ConfigDocument) {
    if document.is_empty() {
        println!("No servers configured");
        return;
    }

    let version = document
        .version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    let modified_by = document.modified_by.as_deref().unwrap_or("-");
    let modified_at = document
        .last_modified
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} servers ({} enabled)  version {}  last saved {} by {}",
        document.mcp_servers.len(),
        document.enabled_count(),
        version,
        modified_at,
        modified_by
    );
    println!();

    for (name, entry) in &document.mcp_servers {
        let state = if entry.is_enabled() {
            style("on ").green()
        } else {
            style("off").dim()
        };
        println!("  {} {}", state, style(name).bold());
        println!("      {}", entry.command_line());
        if !entry.env.is_empty() {
            let keys: Vec<&str> = entry.env.keys().map(String::as_str).collect();
            println!("      env: {}", keys.join(", "));
        }
    }
}

pub fn describe_result(result: &TargetResult) -> String {
    if result.is_success() {
        let path = result
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let backup = match result.backup.as_ref().and_then(|b| b.path.as_ref()) {
            Some(backup) if result.backup_created() => format!(" (backup: {})", backup.display()),
            _ => String::new(),
        };
        format!("✓ {}: {}{}", result.target, path, backup)
    } else {
        format!(
            "✗ {}: {}",
            result.target,
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub fn print_results(results: &[TargetResult]) {
    for result in results {
        println!("{}", describe_result(result));
    }
    let backups = backup_count(results);
    if backups > 0 {
        println!("  {backups} backup(s) created");
    }
}

/// Distinct backup files behind `results`; targets sharing a file share one.
pub fn backup_count(results: &[TargetResult]) -> usize {
    results
        .iter()
        .filter(|r| r.backup_created())
        .filter_map(|r| r.backup.as_ref().and_then(|b| b.path.as_ref()))
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn print_client_settings(settings: &ClientSettings, settings_path: &str) {
    println!("{}", style("Client settings").bold());
    println!("  file:        {settings_path}");
    println!("  gist id:     {}", display_or_unset(&settings.gist_id));
    println!("  token:       {}", mask_token(&settings.github_token));
    println!("  gist file:   {}", settings.file_name);
    println!("  helper:      {}", settings.helper_url);
    println!("  max backups: {}", settings.max_backups);
    println!(
        "  device:      {}",
        settings.device_name.as_deref().unwrap_or("(unknown)")
    );
    for target in TargetId::ALL {
        if let Some(path) = settings.paths.get(target) {
            println!("  {:<12} {}", format!("{target}:"), path.display());
        }
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use mcpilot_core::backup::BackupOutcome;

    #[test]
    fn mask_token_keeps_tail() {
        assert_eq!(mask_token("ghp_abcdef1234"), "**********1234");
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "(not set)");
    }

    #[test]
    fn describe_success_mentions_backup() {
        let result = TargetResult::success(
            TargetId::Desktop,
            PathBuf::from("/cfg/claude_desktop_config.json"),
            BackupOutcome::created(PathBuf::from("/cfg/backups/x.json")),
        );
        assert_eq!(
            describe_result(&result),
            "✓ Claude Desktop: /cfg/claude_desktop_config.json (backup: /cfg/backups/x.json)"
        );
    }

    #[test]
    fn describe_failure_shows_error() {
        let result = TargetResult::failure(TargetId::Cursor, "permission denied");
        assert_eq!(describe_result(&result), "✗ Cursor: permission denied");
    }

    #[test]
    fn shared_backup_is_counted_once() {
        let backup = BackupOutcome::created(PathBuf::from("/home/u/.cursor/backups/mcp-x.json"));
        let live = PathBuf::from("/home/u/.cursor/mcp.json");
        let results = vec![
            TargetResult::success(TargetId::Cursor, live.clone(), backup.clone()),
            TargetResult::success(TargetId::ClaudeIdeCursor, live, backup),
            TargetResult::success(
                TargetId::Desktop,
                PathBuf::from("/cfg/claude_desktop_config.json"),
                BackupOutcome::none(),
            ),
        ];

        assert_eq!(backup_count(&results), 1);
    }
}
