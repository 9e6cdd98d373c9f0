//! Shared state for request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mcpilot_core::config::{HelperSettings, SettingsUpdate};
use mcpilot_core::host::HostInfo;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    settings: Arc<RwLock<HelperSettings>>,
    static_root: Arc<PathBuf>,
    host: Arc<HostInfo>,
}

impl AppState {
    pub fn new(settings: HelperSettings, static_root: PathBuf, host: HostInfo) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            static_root: Arc::new(static_root),
            host: Arc::new(host),
        }
    }

    /// Owned copy of the current settings; a request works on this value only.
    pub async fn settings(&self) -> HelperSettings {
        self.settings.read().await.clone()
    }

    /// Swap in `current.merged(update)` and return it.
    pub async fn apply_update(&self, update: &SettingsUpdate) -> HelperSettings {
        let mut guard = self.settings.write().await;
        let merged = guard.merged(update);
        *guard = merged.clone();
        merged
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    pub fn host(&self) -> &HostInfo {
        &self.host
    }
}
