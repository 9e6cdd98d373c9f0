//! mcpilot-server - local config writer for the MCPilot UI
//!
//! Usage:
//!   mcpilot-server                      # listen on 127.0.0.1:8080
//!   mcpilot-server --port 9000          # or MCP_PORT=9000
//!   mcpilot-server --static-dir ./ui    # serve the UI from ./ui

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpilot_core::config::{HelperSettings, TargetPathOverrides};
use mcpilot_core::host::HostInfo;
use mcpilot_core::types::Platform;
use mcpilot_server::AppState;

#[derive(Debug, Parser)]
#[command(name = "mcpilot-server")]
#[command(about = "Local helper that writes MCP server configs for desktop clients", version)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "MCP_PORT", default_value_t = mcpilot_core::config::DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "MCP_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Backups kept per target file (0 keeps none)
    #[arg(long, env = "MCP_MAX_BACKUPS", default_value_t = mcpilot_core::config::DEFAULT_MAX_BACKUPS, allow_hyphen_values = true)]
    max_backups: i64,

    /// Claude Code CLI config path
    #[arg(long, env = "MCP_CLAUDE_CODE_PATH")]
    code_path: Option<PathBuf>,

    /// Claude Desktop config path
    #[arg(long, env = "MCP_CLAUDE_DESKTOP_PATH")]
    desktop_path: Option<PathBuf>,

    /// Cursor config path
    #[arg(long, env = "MCP_CURSOR_PATH")]
    cursor_path: Option<PathBuf>,

    /// Claude IDE (Cursor) config path
    #[arg(long, env = "MCP_CLAUDE_IDE_CURSOR_PATH")]
    claude_ide_cursor_path: Option<PathBuf>,

    /// Directory holding the UI's static files (default: current directory)
    #[arg(long, env = "MCP_STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> TargetPathOverrides {
        TargetPathOverrides {
            code: self.code_path.clone(),
            desktop: self.desktop_path.clone(),
            cursor: self.cursor_path.clone(),
            claude_ide_cursor: self.claude_ide_cursor_path.clone(),
        }
    }

    fn settings(&self) -> Result<HelperSettings> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        let defaults = HelperSettings::defaults(&Platform::current(), &home);
        let paths = defaults.paths.with_overrides(&self.overrides());
        Ok(HelperSettings::new(self.port, self.max_backups, paths))
    }

    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address: '{}:{}'", self.bind, self.port))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpilot_server=info,mcpilot_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let addr = cli.addr()?;
    let static_root = match &cli.static_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("MCPilot helper listening on http://{addr}");
    tracing::info!("Claude Code CLI:   {}", settings.paths.code.display());
    tracing::info!("Claude Desktop:    {}", settings.paths.desktop.display());
    tracing::info!("Cursor:            {}", settings.paths.cursor.display());
    tracing::info!(
        "Claude IDE Cursor: {}",
        settings.paths.claude_ide_cursor.display()
    );
    tracing::info!(max_backups = settings.max_backups, static_root = %static_root.display(), "ready");

    let state = AppState::new(settings, static_root, HostInfo::current());
    mcpilot_server::serve(listener, state, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(err) => tracing::error!("failed to listen for Ctrl+C: {err}"),
        }
    })
    .await?;

    tracing::info!("MCPilot helper stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_localhost_on_8080() {
        let cli = Cli::parse_from(["mcpilot-server"]);
        assert_eq!(cli.addr().unwrap(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cli.max_backups, 10);
        assert!(cli.overrides().is_empty());
    }

    #[test]
    fn path_flags_become_overrides() {
        let cli = Cli::parse_from([
            "mcpilot-server",
            "--cursor-path",
            "/tmp/cursor.json",
            "--max-backups",
            "3",
        ]);
        let overrides = cli.overrides();
        assert_eq!(
            overrides.cursor.as_deref(),
            Some(std::path::Path::new("/tmp/cursor.json"))
        );
        assert!(overrides.code.is_none());
        assert_eq!(cli.max_backups, 3);
    }
}
