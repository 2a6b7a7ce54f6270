// Client-side error taxonomy for backend RPC calls
use thiserror::Error;

/// Errors surfaced by the remote client and synchronization controller.
///
/// Every failure a backend round-trip can produce collapses into one of
/// these variants; the synchronization controller converts them into
/// user-visible notifications and never lets them escape as panics.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side precondition: an authenticated call was attempted while
    /// the session markers are absent. No request is sent.
    #[error("not logged in")]
    NotLoggedIn,

    /// Login rejected by the server (bad username/password).
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// Server rejected the bearer token on an authenticated call.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness violation, e.g. a duplicate formula name on create.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Get/update/delete against an id the server does not know.
    #[error("not found: {0}")]
    NotFound(String),

    /// Client-side shape validation failed before the request was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Any other non-2xx response.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Network-level failure (connection refused, timeout, etc).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected wire shape.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Stable machine-readable code for structured CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotLoggedIn => "NOT_LOGGED_IN",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            ApiError::Transport(_) => "TRANSPORT_ERROR",
            ApiError::Json(_) => "MALFORMED_RESPONSE",
        }
    }

    /// Map a non-2xx HTTP status onto the taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            _ => ApiError::UnexpectedStatus { status, message },
        }
    }

    /// True for the duplicate-name class of rejection. The controller
    /// branches its notification text on this, and nothing else.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }
}
