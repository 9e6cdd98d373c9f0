//! Interactive server form.
//!
//! Collects a [`ServerDraft`] with dialoguer prompts when `server add` or
//! `server edit` is run with `-i`, or without a command.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use mcpilot_core::document::{CommandKind, ServerDraft};

const COMMAND_CHOICES: [&str; 6] = ["npx", "uvx", "node", "python", "docker", "custom"];

pub struct ServerForm<W: Write = io::Stdout> {
    /// Values already known; prompts default to them.
    draft: ServerDraft,
    writer: W,
    theme: ColorfulTheme,
}

impl ServerForm<io::Stdout> {
    pub fn new(draft: ServerDraft) -> Self {
        Self {
            draft,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> ServerForm<W> {
    #[cfg(test)]
    pub fn with_writer(draft: ServerDraft, writer: W) -> Self {
        Self {
            draft,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run every prompt and return the edited draft, or `None` if the user
    /// declined the summary.
    pub fn collect(mut self) -> Result<Option<ServerDraft>> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  MCP Server").bold().cyan())?;
        writeln!(self.writer)?;

        self.draft.name = Input::with_theme(&self.theme)
            .with_prompt("Server name")
            .with_initial_text(self.draft.name.clone())
            .interact_text()?;

        self.prompt_command()?;
        self.prompt_package()?;
        self.prompt_args()?;
        self.prompt_env()?;

        self.draft.enabled = Confirm::with_theme(&self.theme)
            .with_prompt("Enabled?")
            .default(self.draft.enabled)
            .interact()?;

        self.write_summary()?;
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Save this server?")
            .default(true)
            .interact()?;

        Ok(confirmed.then_some(self.draft))
    }

    fn prompt_command(&mut self) -> Result<()> {
        let current = self.draft.kind();
        let default = match current {
            CommandKind::Npx => 0,
            CommandKind::Uvx => 1,
            CommandKind::Node => 2,
            CommandKind::Python => 3,
            CommandKind::Docker => 4,
            CommandKind::Custom => 5,
        };
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Command")
            .items(&COMMAND_CHOICES[..])
            .default(default)
            .interact()?;

        self.draft.command = if COMMAND_CHOICES[selection] == "custom" {
            let initial = if current == CommandKind::Custom {
                self.draft.command.clone()
            } else {
                String::new()
            };
            Input::with_theme(&self.theme)
                .with_prompt("Custom command")
                .with_initial_text(initial)
                .interact_text()?
        } else {
            COMMAND_CHOICES[selection].to_string()
        };
        Ok(())
    }

    fn prompt_package(&mut self) -> Result<()> {
        if !self.draft.kind().takes_package() {
            self.draft.package = None;
            return Ok(());
        }
        let package: String = Input::with_theme(&self.theme)
            .with_prompt("Package / script")
            .with_initial_text(self.draft.package.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        self.draft.package = Some(package);
        Ok(())
    }

    fn prompt_args(&mut self) -> Result<()> {
        let line: String = Input::with_theme(&self.theme)
            .with_prompt("Arguments (separated by spaces)")
            .with_initial_text(self.draft.args.join(" "))
            .allow_empty(true)
            .interact_text()?;
        self.draft.args = split_args(&line);
        Ok(())
    }

    fn prompt_env(&mut self) -> Result<()> {
        let mut rows = Vec::new();
        for (key, value) in &self.draft.env {
            let keep = Confirm::with_theme(&self.theme)
                .with_prompt(format!("Keep {key}?"))
                .default(true)
                .interact()?;
            if keep {
                rows.push((key.clone(), value.clone()));
            }
        }
        loop {
            let row: String = Input::with_theme(&self.theme)
                .with_prompt("Env var KEY=VALUE (empty to finish)")
                .allow_empty(true)
                .interact_text()?;
            if row.trim().is_empty() {
                break;
            }
            match row.split_once('=') {
                Some((key, value)) => rows.push((key.to_string(), value.to_string())),
                None => writeln!(self.writer, "  {}", style("expected KEY=VALUE").yellow())?,
            }
        }
        self.draft.env = rows;
        Ok(())
    }

    fn write_summary(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  Name:     {}", style(&self.draft.name).green())?;
        writeln!(self.writer, "  Command:  {}", style(&self.draft.command).green())?;
        if let Some(package) = self.draft.package.as_deref().filter(|p| !p.is_empty()) {
            writeln!(self.writer, "  Package:  {}", style(package).green())?;
        }
        if !self.draft.args.is_empty() {
            writeln!(
                self.writer,
                "  Args:     {}",
                style(self.draft.args.join(" ")).green()
            )?;
        }
        for (key, _) in &self.draft.env {
            writeln!(self.writer, "  Env:      {}", style(key).green())?;
        }
        let state = if self.draft.enabled {
            "enabled"
        } else {
            "disabled"
        };
        writeln!(self.writer, "  State:    {}", style(state).green())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Split a prompt line into arguments on whitespace.
pub fn split_args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_args_drops_extra_whitespace() {
        assert_eq!(
            split_args("  --port   3000 --verbose "),
            vec!["--port", "3000", "--verbose"]
        );
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn summary_lists_draft_fields() {
        let mut draft = ServerDraft::new("fs", "npx");
        draft.package = Some("@modelcontextprotocol/server-filesystem".to_string());
        draft.args = vec!["/tmp".to_string()];
        draft.env = vec![("TOKEN".to_string(), "x".to_string())];

        let mut output = Vec::new();
        {
            let mut form = ServerForm::with_writer(draft, &mut output);
            form.write_summary().unwrap();
        }

        let text = console::strip_ansi_codes(&String::from_utf8(output).unwrap()).into_owned();
        assert!(text.contains("Name:     fs"));
        assert!(text.contains("Package:  @modelcontextprotocol/server-filesystem"));
        assert!(text.contains("Args:     /tmp"));
        assert!(text.contains("Env:      TOKEN"));
        assert!(text.contains("State:    enabled"));
    }
}
