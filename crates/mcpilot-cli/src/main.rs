//! MCPilot - keep MCP server configs in sync through a Gist
//!
//! Usage:
//!   mcpilot pull                    # load servers from the gist
//!   mcpilot server add fs -c npx -p @modelcontextprotocol/server-filesystem
//!   mcpilot apply all               # write configs through the local helper
//!   mcpilot push                    # save servers back to the gist

mod commands;
mod interactive;
mod output;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpilot_core::document::ServerDraft;
use mcpilot_core::types::TargetId;

use crate::commands::{App, ClientSettingsEdit, ServerEdit};
use crate::interactive::ServerForm;

#[derive(Parser)]
#[command(name = "mcpilot")]
#[command(about = "MCP server config manager", long_about = None, version)]
struct Cli {
    /// Directory holding client.toml and the working copy
    #[arg(long, global = true, env = "MCPILOT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the server list from the gist into the working copy
    Pull,

    /// Save the working copy to the gist (bumps the version)
    Push,

    /// List servers in the working copy
    #[command(alias = "ls")]
    List {
        /// Print the raw document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add, edit, remove or toggle servers
    Server(ServerArgs),

    /// Write the clean config to a target (code, desktop, cursor,
    /// claudeIdeCursor, both, all)
    ///
    /// Uses the local helper when it supports direct saves; otherwise the
    /// config files are written to --out-dir for manual copying.
    Apply {
        target: String,
        /// Fallback export directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Export the clean config to files without using the helper
    Export {
        target: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Client and helper settings
    Settings(SettingsArgs),

    /// Show local helper status
    Status,
}

#[derive(Args)]
struct ServerArgs {
    #[command(subcommand)]
    command: ServerSubcommand,
}

#[derive(Subcommand)]
enum ServerSubcommand {
    /// Add a new server
    Add {
        name: Option<String>,
        #[command(flatten)]
        fields: ServerFields,
        /// Prompt for every field
        #[arg(short, long)]
        interactive: bool,
    },

    /// Edit an existing server
    Edit {
        name: String,
        /// New name for the server
        #[arg(long)]
        rename: Option<String>,
        #[command(flatten)]
        fields: ServerFields,
        /// Remove an env var
        #[arg(long = "unset-env", value_name = "KEY")]
        unset_env: Vec<String>,
        /// Enable the server
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(short, long)]
        interactive: bool,
    },

    /// Delete a server
    #[command(alias = "rm")]
    Remove {
        name: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Flip a server between enabled and disabled
    Toggle { name: String },
}

#[derive(Args, Default)]
struct ServerFields {
    /// Executable (npx, uvx, node, python, docker, or any command)
    #[arg(short, long)]
    command: Option<String>,

    /// Package or script; becomes the first argument for npx/uvx/node/python
    #[arg(short, long)]
    package: Option<String>,

    /// Argument (repeatable)
    #[arg(short, long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Env var as KEY=VALUE (repeatable)
    #[arg(short, long, value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// Store the server disabled
    #[arg(long)]
    disable: bool,
}

#[derive(Args)]
struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand)]
enum SettingsSubcommand {
    /// Show client settings
    Show,

    /// Change client settings
    Set {
        #[arg(long)]
        gist_id: Option<String>,
        #[arg(long)]
        token: Option<String>,
        /// File inside the gist holding the document
        #[arg(long)]
        file_name: Option<String>,
        #[arg(long)]
        helper_url: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        max_backups: Option<i64>,
        #[arg(long)]
        device_name: Option<String>,
        /// Path override (empty clears it)
        #[arg(long)]
        code_path: Option<String>,
        #[arg(long)]
        desktop_path: Option<String>,
        #[arg(long)]
        cursor_path: Option<String>,
        #[arg(long)]
        claude_ide_cursor_path: Option<String>,
    },

    /// Send path overrides and max backups to the helper
    Push,

    /// Show the helper's current settings
    Pull,
}

fn parse_env_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{value}'")),
    }
}

impl ServerFields {
    fn into_draft(self, name: String) -> ServerDraft {
        ServerDraft {
            package: self.package,
            args: self.args,
            env: self.env,
            enabled: !self.disable,
            ..ServerDraft::new(name, self.command.unwrap_or_default())
        }
    }

    fn into_edit(self, rename: Option<String>, unset_env: Vec<String>, enable: bool) -> ServerEdit {
        let enabled = match (enable, self.disable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ServerEdit {
            rename,
            command: self.command,
            package: self.package,
            args: (!self.args.is_empty()).then_some(self.args),
            env: self.env,
            unset_env,
            enabled,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpilot=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut app = App::open(cli.config_dir)?;

    match cli.command {
        Commands::Pull => app.pull().await,
        Commands::Push => app.push().await,
        Commands::List { json } => app.list(json),
        Commands::Server(args) => run_server_command(&app, args.command),
        Commands::Apply { target, out_dir } => app.apply(&target, &out_dir).await,
        Commands::Export { target, out_dir } => app.export(&target, &out_dir),
        Commands::Settings(args) => match args.command {
            SettingsSubcommand::Show => {
                app.settings_show();
                Ok(())
            }
            SettingsSubcommand::Set {
                gist_id,
                token,
                file_name,
                helper_url,
                max_backups,
                device_name,
                code_path,
                desktop_path,
                cursor_path,
                claude_ide_cursor_path,
            } => {
                let paths = [
                    (TargetId::Code, code_path),
                    (TargetId::Desktop, desktop_path),
                    (TargetId::Cursor, cursor_path),
                    (TargetId::ClaudeIdeCursor, claude_ide_cursor_path),
                ]
                .into_iter()
                .filter_map(|(target, path)| path.map(|p| (target, p)))
                .collect();
                app.settings_set(ClientSettingsEdit {
                    gist_id,
                    token,
                    file_name,
                    helper_url,
                    max_backups,
                    device_name,
                    paths,
                })
            }
            SettingsSubcommand::Push => app.settings_push().await,
            SettingsSubcommand::Pull => app.settings_pull().await,
        },
        Commands::Status => app.status().await,
    }
}

fn run_server_command(app: &App, command: ServerSubcommand) -> Result<()> {
    match command {
        ServerSubcommand::Add {
            name,
            fields,
            interactive,
        } => {
            let needs_form = interactive || name.is_none() || fields.command.is_none();
            let draft = fields.into_draft(name.unwrap_or_default());
            let draft = if needs_form {
                match ServerForm::new(draft).collect()? {
                    Some(draft) => draft,
                    None => {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
            } else {
                draft
            };
            app.add_server(draft)
        }
        ServerSubcommand::Edit {
            name,
            rename,
            fields,
            unset_env,
            enable,
            interactive,
        } => {
            let mut draft = app.draft_for(&name)?;
            fields.into_edit(rename, unset_env, enable).apply(&mut draft);
            if interactive {
                match ServerForm::new(draft).collect()? {
                    Some(edited) => draft = edited,
                    None => {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }
            }
            app.replace_server(&name, draft)
        }
        ServerSubcommand::Remove { name, yes } => app.remove_server(&name, yes),
        ServerSubcommand::Toggle { name } => {
            if name.trim().is_empty() {
                bail!("Please fill in required fields: name");
            }
            app.toggle_server(&name)
        }
    }
}
