//! Editing session: the in-memory document and its remote round trips.

use chrono::{DateTime, Utc};

use crate::config::ClientSettings;
use crate::document::{CleanConfig, ConfigDocument, DocumentVersion, clean_config};
use crate::helper::HelperClient;
use crate::host::UNKNOWN_DEVICE;
use crate::remote::{RemoteError, RemoteStore};

/// What a successful load brought in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub servers: usize,
    pub version: Option<DocumentVersion>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Metadata stamped by a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub version: DocumentVersion,
    pub last_modified: DateTime<Utc>,
    pub modified_by: String,
}

pub struct ConfigSession<S: RemoteStore> {
    store: S,
    document: ConfigDocument,
}

impl<S: RemoteStore> ConfigSession<S> {
    /// A session starting from an empty document.
    pub fn new(store: S) -> Self {
        Self::with_document(store, ConfigDocument::new())
    }

    pub fn with_document(store: S, document: ConfigDocument) -> Self {
        Self { store, document }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }

    pub fn into_document(self) -> ConfigDocument {
        self.document
    }

    /// Replace the document wholesale with the remote one.
    ///
    /// On failure the current document is left as it was.
    pub async fn load(&mut self) -> Result<LoadSummary, RemoteError> {
        let snapshot = self.store.fetch().await?;
        self.document = snapshot.document;
        Ok(LoadSummary {
            servers: self.document.mcp_servers.len(),
            version: self.document.version,
            updated_at: snapshot.updated_at,
        })
    }

    /// Stamp and push the whole document.
    ///
    /// The stamp is applied to a copy and kept only once the store accepts it.
    pub async fn save(&mut self, device: &str) -> Result<SaveReceipt, RemoteError> {
        self.save_at(device, Utc::now()).await
    }

    pub async fn save_at(
        &mut self,
        device: &str,
        now: DateTime<Utc>,
    ) -> Result<SaveReceipt, RemoteError> {
        let mut next = self.document.clone();
        let version = next.stamp(device, now);
        self.store.store(&next).await?;

        let receipt = SaveReceipt {
            version,
            last_modified: now,
            modified_by: device.to_string(),
        };
        self.document = next;
        Ok(receipt)
    }

    pub fn clean(&self) -> CleanConfig {
        clean_config(&self.document)
    }
}

/// Name recorded as `modifiedBy`: the helper's hostname, else the cached
/// device name, else `Unknown_Device`. A helper answer refreshes the cache.
pub async fn resolve_device_name(
    helper: Option<&HelperClient>,
    settings: &mut ClientSettings,
) -> String {
    if let Some(helper) = helper {
        match helper.hostname().await {
            Ok(info) if !info.hostname.trim().is_empty() => {
                settings.device_name = Some(info.hostname.clone());
                return info.hostname;
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "helper hostname unavailable"),
        }
    }

    settings
        .device_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_DEVICE.to_string())
}
