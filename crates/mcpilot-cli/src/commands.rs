//! Subcommand implementations over the client store, the Gist and the helper.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use mcpilot_core::config::{ClientSettings, ClientStore, SettingsUpdate};
use mcpilot_core::document::{ConfigDocument, ServerDraft, clean_config};
use mcpilot_core::export::export_clean_config;
use mcpilot_core::helper::HelperClient;
use mcpilot_core::remote::GistClient;
use mcpilot_core::session::{ConfigSession, resolve_device_name};
use mcpilot_core::types::{TargetId, TargetSelector};

use crate::output;

/// Field changes for `server edit`. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct ServerEdit {
    pub rename: Option<String>,
    pub command: Option<String>,
    pub package: Option<String>,
    pub args: Option<Vec<String>>,
    pub env: Vec<(String, String)>,
    pub unset_env: Vec<String>,
    pub enabled: Option<bool>,
}

impl ServerEdit {
    /// Apply the changes to a draft built from the existing entry.
    pub fn apply(self, draft: &mut ServerDraft) {
        if let Some(name) = self.rename {
            draft.name = name;
        }
        if let Some(command) = self.command {
            if !mcpilot_core::document::CommandKind::infer(&command).takes_package() {
                draft.package = None;
            }
            draft.command = command;
        }
        if let Some(package) = self.package {
            draft.package = Some(package);
        }
        if let Some(args) = self.args {
            draft.args = args;
        }
        draft.env.retain(|(key, _)| !self.unset_env.contains(key));
        for (key, value) in self.env {
            match draft.env.iter_mut().find(|(k, _)| *k == key) {
                Some(row) => row.1 = value,
                None => draft.env.push((key, value)),
            }
        }
        if let Some(enabled) = self.enabled {
            draft.enabled = enabled;
        }
    }
}

/// Changes for `settings set`. Empty path strings clear an override.
#[derive(Debug, Default)]
pub struct ClientSettingsEdit {
    pub gist_id: Option<String>,
    pub token: Option<String>,
    pub file_name: Option<String>,
    pub helper_url: Option<String>,
    pub max_backups: Option<i64>,
    pub device_name: Option<String>,
    pub paths: Vec<(TargetId, String)>,
}

impl ClientSettingsEdit {
    pub fn apply(self, settings: &mut ClientSettings) {
        if let Some(gist_id) = self.gist_id {
            settings.gist_id = gist_id.trim().to_string();
        }
        if let Some(token) = self.token {
            settings.github_token = token.trim().to_string();
        }
        if let Some(file_name) = self.file_name {
            settings.file_name = file_name;
        }
        if let Some(helper_url) = self.helper_url {
            settings.helper_url = helper_url;
        }
        if let Some(max_backups) = self.max_backups {
            settings.max_backups = max_backups;
        }
        if let Some(device_name) = self.device_name {
            settings.device_name = Some(device_name).filter(|name| !name.trim().is_empty());
        }
        for (target, path) in self.paths {
            let path = Some(PathBuf::from(path)).filter(|p| !p.as_os_str().is_empty());
            settings.paths.set(target, path);
        }
    }
}

pub struct App {
    store: ClientStore,
    settings: ClientSettings,
}

impl App {
    pub fn open(config_dir: Option<PathBuf>) -> Result<Self> {
        let store = match config_dir {
            Some(dir) => ClientStore::from_dir(dir),
            None => ClientStore::from_default_dir()?,
        };
        let settings = store.load_settings()?;
        Ok(Self { store, settings })
    }

    fn gist(&self) -> Result<GistClient> {
        if !self.settings.has_credentials() {
            bail!(
                "Please configure GitHub settings first: mcpilot settings set --gist-id <ID> --token <TOKEN>"
            );
        }
        Ok(GistClient::new(&self.settings.gist_id, &self.settings.github_token)?
            .with_file_name(&self.settings.file_name))
    }

    fn helper(&self) -> Result<HelperClient> {
        HelperClient::new(&self.settings.helper_url)
    }

    fn working_copy(&self) -> Result<ConfigDocument> {
        self.store.load_working_copy()
    }

    fn save_working_copy(&self, document: &ConfigDocument) -> Result<()> {
        self.store.save_working_copy(document)
    }

    pub async fn pull(&self) -> Result<()> {
        let mut session = ConfigSession::with_document(self.gist()?, self.working_copy()?);
        let summary = session.load().await?;
        self.save_working_copy(session.document())?;

        let version = summary
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "✓ Loaded {} servers from gist (version {})",
            summary.servers, version
        );
        if let Some(updated_at) = summary.updated_at {
            println!("  last updated {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        Ok(())
    }

    pub async fn push(&mut self) -> Result<()> {
        let gist = self.gist()?;
        let helper = self.helper().ok();
        let device = resolve_device_name(helper.as_ref(), &mut self.settings).await;
        self.store.save_settings(&self.settings)?;

        let mut session = ConfigSession::with_document(gist, self.working_copy()?);
        let receipt = session.save(&device).await?;
        println!(
            "✓ Saved to gist (version {}, by {})",
            receipt.version, receipt.modified_by
        );

        if let Err(err) = session.load().await {
            tracing::warn!(error = %err, "reload after save failed");
        }
        self.save_working_copy(session.document())
    }

    pub fn list(&self, json: bool) -> Result<()> {
        let document = self.working_copy()?;
        if json {
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            output::print_servers(&document);
        }
        Ok(())
    }

    pub fn add_server(&self, draft: ServerDraft) -> Result<()> {
        let mut document = self.working_copy()?;
        let (name, entry) = draft.build()?;
        document.add(name.clone(), entry)?;
        self.save_working_copy(&document)?;
        println!("✓ Added server '{name}'");
        Ok(())
    }

    /// Current entry as a draft, for editing.
    pub fn draft_for(&self, name: &str) -> Result<ServerDraft> {
        let document = self.working_copy()?;
        let entry = document
            .server(name)
            .with_context(|| format!("Server '{name}' not found"))?;
        Ok(ServerDraft::from_entry(name, entry))
    }

    pub fn replace_server(&self, old_name: &str, draft: ServerDraft) -> Result<()> {
        let mut document = self.working_copy()?;
        let (name, entry) = draft.build()?;
        document.rename(old_name, &name, entry)?;
        self.save_working_copy(&document)?;
        if name == old_name {
            println!("✓ Updated server '{name}'");
        } else {
            println!("✓ Updated server '{old_name}' (renamed to '{name}')");
        }
        Ok(())
    }

    pub fn remove_server(&self, name: &str, yes: bool) -> Result<()> {
        let mut document = self.working_copy()?;
        if document.server(name).is_none() {
            bail!("Server '{name}' not found");
        }
        if !yes {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Delete server '{name}'?"))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled.");
                return Ok(());
            }
        }
        document.remove(name)?;
        self.save_working_copy(&document)?;
        println!("✓ Deleted server '{name}'");
        Ok(())
    }

    pub fn toggle_server(&self, name: &str) -> Result<()> {
        let mut document = self.working_copy()?;
        let enabled = document.toggle(name)?;
        self.save_working_copy(&document)?;
        let state = if enabled { "enabled" } else { "disabled" };
        println!("✓ Server '{name}' {state}");
        Ok(())
    }

    /// Write to the targets through the helper, or export files when it
    /// cannot be used.
    pub async fn apply(&self, target: &str, out_dir: &Path) -> Result<()> {
        let document = self.working_copy()?;
        if document.is_empty() {
            bail!("No servers loaded yet!");
        }
        let selector = parse_selector(target)?;

        let helper = self.helper()?;
        if helper.supports_direct_save().await {
            match helper.save_config(&document, &selector).await {
                Ok(results) => {
                    output::print_results(&results);
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!(error = %err, "direct save failed, exporting files instead");
                }
            }
        }

        let written = export_clean_config(&clean_config(&document), &selector, out_dir)?;
        println!(
            "{}",
            style(format!(
                "Local helper not used ({}); exported instead:",
                helper.base_url()
            ))
            .yellow()
        );
        for path in written {
            println!("  {}", path.display());
        }
        Ok(())
    }

    pub fn export(&self, target: &str, out_dir: &Path) -> Result<()> {
        let document = self.working_copy()?;
        if document.is_empty() {
            bail!("No servers loaded yet!");
        }
        let selector = parse_selector(target)?;
        for path in export_clean_config(&clean_config(&document), &selector, out_dir)? {
            println!("✓ Exported {}", path.display());
        }
        Ok(())
    }

    pub fn settings_show(&self) {
        output::print_client_settings(
            &self.settings,
            &self.store.settings_path().display().to_string(),
        );
    }

    pub fn settings_set(&mut self, edit: ClientSettingsEdit) -> Result<()> {
        edit.apply(&mut self.settings);
        self.store.save_settings(&self.settings)?;
        println!("✓ Settings saved to {}", self.store.settings_path().display());
        Ok(())
    }

    /// Send path overrides and the retention limit to the helper.
    pub async fn settings_push(&self) -> Result<()> {
        let overrides = self.settings.paths.non_empty();
        let update = SettingsUpdate {
            paths: (!overrides.is_empty()).then_some(overrides),
            max_backups: Some(self.settings.max_backups),
        };
        let settings = self.helper()?.update_settings(&update).await?;
        println!("✓ Helper settings updated");
        print_helper_paths(&settings.paths, settings.max_backups);
        Ok(())
    }

    pub async fn settings_pull(&self) -> Result<()> {
        let settings = self.helper()?.settings().await?;
        println!("{} (port {})", style("Helper settings").bold(), settings.port);
        print_helper_paths(&settings.paths, settings.max_backups);
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        let helper = self.helper()?;
        match helper.status().await {
            Ok(report) => {
                println!(
                    "{} helper {} at {}",
                    style("●").green(),
                    report.status,
                    helper.base_url()
                );
                println!("  version:      {}", report.version);
                println!("  capabilities: {}", report.capabilities.join(", "));
                print_helper_paths(&report.paths, report.max_backups);
            }
            Err(err) => {
                println!("{} helper not available: {err}", style("●").red());
                println!("  apply will export files instead of writing configs");
            }
        }
        let gist = if self.settings.has_credentials() {
            self.settings.gist_id.as_str()
        } else {
            "(not configured)"
        };
        println!("  gist:         {gist}");
        Ok(())
    }
}

fn print_helper_paths(paths: &mcpilot_core::config::TargetPaths, max_backups: i64) {
    for target in TargetId::ALL {
        println!("  {:<18} {}", target.label(), paths.get(target).display());
    }
    println!("  max backups:  {max_backups}");
}

pub fn parse_selector(target: &str) -> Result<TargetSelector> {
    let selector = TargetSelector::parse(target);
    if !selector.is_known() {
        bail!(
            "Unknown target '{target}' (expected code, desktop, cursor, claudeIdeCursor, both or all)"
        );
    }
    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpilot_core::document::ServerEntry;
    use tempfile::TempDir;

    fn app_in(temp: &TempDir) -> App {
        App::open(Some(temp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn edit_replaces_only_given_fields() {
        let entry = ServerEntry::new("npx")
            .with_args(["-y", "server-fs", "/tmp"])
            .with_env("A", "1")
            .with_env("B", "2");
        let mut draft = ServerDraft::from_entry("fs", &entry);

        ServerEdit {
            env: vec![("A".to_string(), "9".to_string())],
            unset_env: vec!["B".to_string()],
            enabled: Some(false),
            ..ServerEdit::default()
        }
        .apply(&mut draft);

        let (name, built) = draft.build().unwrap();
        assert_eq!(name, "fs");
        assert_eq!(built.args, vec!["-y", "server-fs", "/tmp"]);
        assert_eq!(built.env.get("A").map(String::as_str), Some("9"));
        assert!(!built.env.contains_key("B"));
        assert!(!built.is_enabled());
    }

    #[test]
    fn switching_to_docker_drops_package_slot() {
        let entry = ServerEntry::new("npx").with_args(["server-fs"]);
        let mut draft = ServerDraft::from_entry("fs", &entry);

        ServerEdit {
            command: Some("docker".to_string()),
            args: Some(vec!["run".to_string(), "img".to_string()]),
            ..ServerEdit::default()
        }
        .apply(&mut draft);

        let (_, built) = draft.build().unwrap();
        assert_eq!(built.command, "docker");
        assert_eq!(built.args, vec!["run", "img"]);
    }

    #[test]
    fn settings_edit_clears_empty_path_override() {
        let mut settings = ClientSettings::default();
        settings
            .paths
            .set(TargetId::Cursor, Some(PathBuf::from("/old.json")));

        ClientSettingsEdit {
            token: Some("  ghp_x  ".to_string()),
            paths: vec![
                (TargetId::Cursor, String::new()),
                (TargetId::Code, "/c.json".to_string()),
            ],
            ..ClientSettingsEdit::default()
        }
        .apply(&mut settings);

        assert_eq!(settings.github_token, "ghp_x");
        assert!(settings.paths.get(TargetId::Cursor).is_none());
        assert_eq!(
            settings.paths.get(TargetId::Code),
            Some(Path::new("/c.json"))
        );
    }

    #[test]
    fn server_lifecycle_persists_working_copy() {
        let temp = TempDir::new().unwrap();
        let app = app_in(&temp);

        let mut draft = ServerDraft::new("fetch", "uvx");
        draft.package = Some("mcp-server-fetch".to_string());
        app.add_server(draft).unwrap();
        assert!(app.add_server(ServerDraft::new("fetch", "uvx")).is_err());

        app.toggle_server("fetch").unwrap();
        let document = app.working_copy().unwrap();
        assert!(!document.server("fetch").unwrap().is_enabled());

        let mut draft = app.draft_for("fetch").unwrap();
        draft.name = "web-fetch".to_string();
        app.replace_server("fetch", draft).unwrap();
        let document = app.working_copy().unwrap();
        assert!(document.server("fetch").is_none());
        assert_eq!(
            document.server("web-fetch").unwrap().args,
            vec!["mcp-server-fetch"]
        );

        app.remove_server("web-fetch", true).unwrap();
        assert!(app.working_copy().unwrap().is_empty());
    }

    #[test]
    fn export_requires_servers() {
        let temp = TempDir::new().unwrap();
        let app = app_in(&temp);

        let err = app.export("desktop", temp.path()).unwrap_err();

        assert_eq!(err.to_string(), "No servers loaded yet!");
    }

    #[test]
    fn unknown_target_is_rejected() {
        assert!(parse_selector("vscode").is_err());
        assert!(parse_selector("claudeIdeCursor").is_ok());
    }

    #[tokio::test]
    async fn apply_falls_back_to_export_when_helper_is_down() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);
        app.settings.helper_url = "http://127.0.0.1:1".to_string();
        app.add_server(ServerDraft::new("local", "node")).unwrap();
        let out = temp.path().join("out");

        app.apply("both", &out).await.unwrap();

        assert!(out.join("claude_desktop_config.json").exists());
        assert!(out.join("claude.json").exists());
    }

    #[tokio::test]
    async fn push_without_credentials_fails_early() {
        let temp = TempDir::new().unwrap();
        let mut app = app_in(&temp);

        let err = app.push().await.unwrap_err();

        assert!(err.to_string().contains("Please configure GitHub settings"));
    }
}
