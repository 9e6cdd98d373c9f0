//! Identity of the machine the writer runs on.

use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// Device name recorded when no hostname is known.
pub const UNKNOWN_DEVICE: &str = "Unknown_Device";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub os_type: String,
}

impl HostInfo {
    pub fn current() -> Self {
        Self::new(hostname(), &Platform::current())
    }

    pub fn new(hostname: impl Into<String>, platform: &Platform) -> Self {
        Self {
            hostname: hostname.into(),
            platform: platform.node_platform().to_string(),
            os_type: platform.os_type().to_string(),
        }
    }
}

/// Best-effort hostname: `COMPUTERNAME`, then `HOSTNAME`, then `/etc/hostname`.
pub fn hostname() -> String {
    ["COMPUTERNAME", "HOSTNAME"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_info_uses_node_style_names() {
        let info = HostInfo::new("workstation", &Platform::MacOs);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["hostname"], "workstation");
        assert_eq!(json["platform"], "darwin");
        assert_eq!(json["type"], "Darwin");
    }

    #[test]
    fn hostname_is_never_empty() {
        assert!(!hostname().is_empty());
    }
}
