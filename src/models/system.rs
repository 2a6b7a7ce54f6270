use serde::{Deserialize, Serialize};

/// Read-only build/deployment snapshot, refreshed once per app load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub build_time: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub semver: String,
    #[serde(default)]
    pub debug_enabled: bool,
    #[serde(default)]
    pub frontend_enabled: bool,
}
