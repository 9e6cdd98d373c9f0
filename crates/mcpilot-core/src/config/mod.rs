//! Configuration: target paths, writer settings and client-side state.

pub mod paths;
pub mod settings;
pub mod store;

pub use paths::{TargetPathOverrides, TargetPaths, default_target_path};
pub use settings::{
    DEFAULT_MAX_BACKUPS, DEFAULT_PORT, HelperSettings, SettingsError, SettingsUpdate,
};
pub use store::{ClientSettings, ClientStore};
