//! Error types for the review relay

/// Errors that can occur in the review relay
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API request to {url} returned status {status} {reason}: {body}")]
    UnexpectedStatus {
        status: u16,
        reason: String,
        body: String,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected type in API response: {0}")]
    TypeMismatch(String),

    #[error("Missing key in API response: {0}")]
    MissingKey(String),

    #[error("No status data in API response")]
    EmptyData,

    #[error("Unknown review verdict: {0}")]
    UnknownVerdict(String),

    #[error("Failed to send message: {0}")]
    SendMessage(String),
}

impl RelayError {
    /// Whether this error should be forwarded to the chat as a failure notice.
    ///
    /// Send failures are never reported through the channel that just failed.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, RelayError::SendMessage(_) | RelayError::Config(_))
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
