//! Remote document store.
//!
//! The canonical [`ConfigDocument`] lives in a single named file of a remote
//! blob. It is always read and written whole.

pub mod gist;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::document::ConfigDocument;

pub use gist::GistClient;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Please configure GitHub token in settings")]
    MissingCredentials,
    #[error("Invalid GitHub token. Please check settings.")]
    Unauthorized,
    #[error("Gist not found. Please check the Gist ID.")]
    NotFound,
    #[error("File '{0}' not found in gist")]
    MissingFile(String),
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },
    #[error("request to remote store failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote document is not valid JSON: {0}")]
    InvalidDocument(#[from] serde_json::Error),
    #[error("invalid remote store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A fetched document and the store's last-updated time for it.
#[derive(Debug, Clone)]
pub struct RemoteSnapshot {
    pub document: ConfigDocument,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Whole-document storage. No partial updates, no retries.
pub trait RemoteStore {
    fn fetch(&self) -> impl Future<Output = Result<RemoteSnapshot, RemoteError>> + Send;

    fn store(
        &self,
        document: &ConfigDocument,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
