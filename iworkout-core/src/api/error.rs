//! Transport error types.

/// Every way a remote call can fail.
///
/// Nothing is retried or swallowed: each failure reaches the caller as one of
/// these variants. The only substitution the transport performs is a 204
/// response becoming the caller's empty-body fallback.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be encoded; nothing was sent.
    #[error("Failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Connectivity, DNS, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Structured error returned by the server for a status >= 400.
    #[error("Server error ({code}): {message}")]
    Api { code: u16, message: String },

    /// A success or error body that did not match the expected shape.
    #[error("Failed to decode response body: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The server answered without the body the call needed.
    #[error("No data retrieved from the server")]
    NoData,
}

impl ApiError {
    /// HTTP status for server-side errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { code, .. } => Some(*code),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
