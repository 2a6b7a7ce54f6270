use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TOKEN_DURATION_SECS;
use crate::error::ApiError;

/// Persisted credential markers: username plus an opaque bearer token, both
/// carrying the same fixed expiry window. Absence of either marker means
/// logged out; local expiry makes a marker read as absent, the way an
/// expired cookie disappears. None of this guarantees the token is still
/// valid server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub username: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// File-backed session store. One JSON file under the config dir holds both
/// markers; the remote client reads the token at call time so a logout
/// invalidates every subsequent call without a revocation round-trip.
#[derive(Debug, Clone)]
pub struct SessionStore {
    config_dir: PathBuf,
    token_duration_secs: u64,
}

impl SessionStore {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir, token_duration_secs: TOKEN_DURATION_SECS }
    }

    pub fn with_token_duration(mut self, secs: u64) -> Self {
        self.token_duration_secs = secs;
        self
    }

    /// Resolve the default credentials directory: $TINTBOOK_CONFIG_DIR if
    /// set, else $HOME/.config/tintbook.
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom) = std::env::var("TINTBOOK_CONFIG_DIR") {
            PathBuf::from(custom)
        } else {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("tintbook")
        };
        Ok(dir)
    }

    fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.json")
    }

    /// Load the markers, treating an expired record as absent.
    pub fn credentials(&self) -> Option<StoredCredentials> {
        let content = fs::read_to_string(self.session_file()).ok()?;
        let creds: StoredCredentials = serde_json::from_str(&content).ok()?;
        if creds.username.is_empty() || creds.token.is_empty() {
            return None;
        }
        if creds.expires_at <= Utc::now() {
            return None;
        }
        Some(creds)
    }

    /// True iff both markers are present and unexpired. No network call;
    /// the server may still reject the token.
    pub fn is_logged_in(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.credentials().map(|c| c.username)
    }

    /// Read at call time by the remote client to build the
    /// `Authorization: Bearer <token>` header.
    pub fn bearer_token(&self) -> Option<String> {
        self.credentials().map(|c| c.token)
    }

    /// Persist both markers with the fixed expiry window.
    pub fn store(&self, username: &str, token: &str) -> Result<(), ApiError> {
        let creds = StoredCredentials {
            username: username.to_string(),
            token: token.to_string(),
            expires_at: Utc::now() + Duration::seconds(self.token_duration_secs as i64),
        };

        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| ApiError::Validation(format!("could not create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(&creds)?;
        fs::write(self.session_file(), content)
            .map_err(|e| ApiError::Validation(format!("could not persist session: {}", e)))?;
        Ok(())
    }

    /// Remove both markers. Pure local operation; no server call.
    pub fn clear(&self) {
        let _ = fs::remove_file(self.session_file());
    }
}
