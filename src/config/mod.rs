use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Fixed token lifetime requested at login: 10,368,000 seconds (~120 days).
/// The persisted session markers expire on the same schedule.
pub const TOKEN_DURATION_SECS: u64 = 10_368_000;

/// Background collection refresh cadence: 3 minutes.
pub const REFRESH_INTERVAL_MS: u64 = 180_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend service, e.g. "http://localhost:8080".
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Requested bearer token lifetime in seconds.
    pub token_duration_secs: u64,
    /// Override for the credentials directory; None means
    /// $TINTBOOK_CONFIG_DIR or $HOME/.config/tintbook.
    pub config_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between background full fetches.
    pub refresh_interval_ms: u64,
    /// Whether the background refresh task is started on login at all.
    pub enable_background_refresh: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("TINTBOOK_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("TINTBOOK_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("TINTBOOK_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("TINTBOOK_TOKEN_DURATION_SECS") {
            self.session.token_duration_secs = v.parse().unwrap_or(self.session.token_duration_secs);
        }
        if let Ok(v) = env::var("TINTBOOK_CONFIG_DIR") {
            self.session.config_dir = Some(v);
        }
        if let Ok(v) = env::var("TINTBOOK_REFRESH_INTERVAL_MS") {
            self.sync.refresh_interval_ms = v.parse().unwrap_or(self.sync.refresh_interval_ms);
        }
        if let Ok(v) = env::var("TINTBOOK_ENABLE_BACKGROUND_REFRESH") {
            self.sync.enable_background_refresh =
                v.parse().unwrap_or(self.sync.enable_background_refresh);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig {
                token_duration_secs: TOKEN_DURATION_SECS,
                config_dir: None,
            },
            sync: SyncConfig {
                refresh_interval_ms: REFRESH_INTERVAL_MS,
                enable_background_refresh: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://tintbook.example.com".to_string(),
                request_timeout_secs: 10,
            },
            session: SessionConfig {
                token_duration_secs: TOKEN_DURATION_SECS,
                config_dir: None,
            },
            sync: SyncConfig {
                refresh_interval_ms: REFRESH_INTERVAL_MS,
                enable_background_refresh: true,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
