//! Store error type.

/// Error from a [`Store`](crate::Store) operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Key is empty or contains empty, `.` or `..` segments.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// Store directory was written by an incompatible format version.
    #[error("store format version {found} is not supported (expected {expected})")]
    Version {
        /// Version found on disk.
        found: String,
        /// Version this build reads and writes.
        expected: String,
    },

    /// I/O error.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not valid JSON for the requested type.
    #[error("invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),
}
