//! Error types for incidents-dash
//!
//! Every failure the dashboard can hit comes from talking to the incidents API.

use thiserror::Error;

/// Main error type for incidents-dash operations
#[derive(Error, Debug)]
pub enum DashError {
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Incident {0} not found")]
    NotFound(i64),

    #[error("Malformed response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid API base URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for incidents-dash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Coarse failure classes the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network unreachable, timeout or a non-2xx status
    Transport,
    /// Body did not decode into the expected shape
    Decode,
    /// Anything local (bad configuration, terminal IO)
    Local,
}

impl DashError {
    /// Classify this error for logging and fail-soft handling
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashError::Transport { .. } | DashError::Status { .. } | DashError::NotFound(_) => {
                ErrorKind::Transport
            }
            DashError::Decode { .. } | DashError::Json(_) => ErrorKind::Decode,
            DashError::InvalidUrl(_) | DashError::Client(_) | DashError::IoError(_) => {
                ErrorKind::Local
            }
        }
    }

    /// Whether the user can simply re-trigger the action to try again
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Decode)
    }
}
