//! Error types

/// Errors a [`SearchSource`](crate::source::SearchSource) may report.
///
/// The pipeline never surfaces these to the embedding caller: a failed
/// computation only clears the pending flag and keeps the previous results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The lookup failed.
    #[error("Search failed: {message}")]
    Failed { message: String },

    /// The lookup was abandoned before it produced anything.
    #[error("Search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Create a [`SearchError::Failed`] with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Errors that can occur when mounting a widget.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// Timers and computations need a tokio runtime to run on.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
