//! MCPilot Core Library
//!
//! Provides the domain logic for keeping a list of MCP server launch entries
//! in sync between a remote Gist document and the config files read by
//! desktop clients (Claude Code, Claude Desktop, Cursor).

pub mod api;
pub mod backup;
pub mod config;
pub mod document;
pub mod export;
pub mod helper;
pub mod host;
pub mod remote;
pub mod session;
pub mod types;
pub mod writer;

/// Re-exports of commonly used types
pub mod prelude {
    // Document model
    pub use crate::document::{
        CleanConfig, CleanServer, ConfigDocument, DocumentVersion, ServerDraft, ServerEntry,
        clean_config,
    };

    // Targets and settings
    pub use crate::config::{ClientSettings, ClientStore, HelperSettings, SettingsUpdate};
    pub use crate::config::{TargetPathOverrides, TargetPaths};
    pub use crate::types::{Platform, TargetId, TargetSelector};

    // Writing
    pub use crate::backup::BackupOutcome;
    pub use crate::writer::{ConfigWriter, TargetResult, TargetStatus};

    // Remote + helper
    pub use crate::helper::HelperClient;
    pub use crate::remote::{GistClient, RemoteError, RemoteStore};
    pub use crate::session::ConfigSession;
}
