//! Fallback export of the clean config when the helper cannot write in place.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::document::CleanConfig;
use crate::types::{TargetId, TargetSelector};

/// File names to export for a selector, deduplicated, in selector order.
///
/// `both` yields the Desktop and Code files; `all` adds `mcp.json` once for
/// the two Cursor targets.
pub fn export_names(selector: &TargetSelector) -> Vec<&'static str> {
    let targets = match selector {
        TargetSelector::Both => vec![TargetId::Desktop, TargetId::Code],
        TargetSelector::All => vec![
            TargetId::Desktop,
            TargetId::Code,
            TargetId::Cursor,
            TargetId::ClaudeIdeCursor,
        ],
        other => other.targets(),
    };

    let mut names: Vec<&'static str> = Vec::new();
    for target in targets {
        let name = target.download_name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Write the clean config into `out_dir` under each export name.
pub fn export_clean_config(
    config: &CleanConfig,
    selector: &TargetSelector,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let names = export_names(selector);
    if names.is_empty() {
        anyhow::bail!("Unknown target: {selector}");
    }

    let content = config
        .to_pretty_json()
        .context("Failed to serialize config")?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create export directory: {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(names.len());
    for name in names {
        let path = out_dir.join(name);
        std::fs::write(&path, &content)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
