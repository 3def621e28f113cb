//! Directory client error types.

/// Errors from querying the charging-station directory.
///
/// These are batch-level failures. Problems with individual records are
/// absorbed during conversion and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No connectivity, timeout or other transport failure
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Directory answered with a non-success status
    #[error("directory returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("failed to decode directory response: {message}")]
    Decode { message: String },
}

impl DirectoryError {
    /// Whether retrying later might succeed (transport and 5xx failures).
    pub fn is_transient(&self) -> bool {
        match self {
            DirectoryError::Network(_) => true,
            DirectoryError::Http { status, .. } => *status >= 500 || *status == 429,
            DirectoryError::Decode { .. } => false,
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DirectoryError::Decode {
                message: err.to_string(),
            }
        } else {
            DirectoryError::Network(err)
        }
    }
}
