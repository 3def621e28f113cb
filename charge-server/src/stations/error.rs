//! Station cache error types.

/// Errors from the station cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationCacheError {
    /// The backing store failed to read or write. The cache contents are
    /// unchanged when this is returned from a mutation.
    #[error("station cache storage error: {message}")]
    Storage { message: String },
}

impl StationCacheError {
    pub(crate) fn storage(message: impl Into<String>) -> Self {
        StationCacheError::Storage {
            message: message.into(),
        }
    }
}
