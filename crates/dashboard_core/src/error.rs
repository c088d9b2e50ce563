use thiserror::Error;

/// Failures surfaced by the synchronizer and detail fetcher.
///
/// `Display` yields the human-readable text stored in `last_error` and in
/// failure notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Input rejected before any request was issued.
    #[error("{0}")]
    Validation(String),
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// No response was obtained (connect failure, timeout, reset).
    #[error("network error: {0}")]
    Network(String),
    /// A success response whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The owning session has been torn down.
    #[error("synchronizer has been shut down")]
    ShutDown,
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}
