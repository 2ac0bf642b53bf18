//! Error types for the state container.

use thiserror::Error;

/// Errors returned by [`StateHolder`](crate::StateHolder) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The owning scope has ended; no further commits are accepted.
    #[error("owning scope is closed")]
    Closed,

    /// No dispatcher was supplied and the caller is not inside a tokio runtime.
    #[error("no tokio runtime available to run guarded operations")]
    NoRuntime,
}

/// Result type for state container operations.
pub type Result<T> = std::result::Result<T, StoreError>;
