//! Error types for chapter publishing.

use canon_store::StoreError;

use crate::error::ConfluenceError;

/// Error during a chapter publish, removal or status check.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The chapter tree could not be converted to storage format.
    ///
    /// Nothing was written to the page.
    #[error("conversion failed: {0}")]
    ConversionFailed(String),

    /// Confluence API error.
    #[error("Confluence API error: {0}")]
    Confluence(#[from] ConfluenceError),

    /// The page kept changing between fetch and update.
    #[error("page {page_id} changed concurrently; gave up after {attempts} attempts")]
    ConflictRetriesExhausted {
        /// Page being updated.
        page_id: String,
        /// Update attempts made.
        attempts: u32,
    },

    /// Local id cannot be embedded in boundary markers.
    #[error("invalid chapter local id {local_id:?}: use ASCII letters, digits, '-' or '_'")]
    InvalidLocalId {
        /// Offending id.
        local_id: String,
    },

    /// Publish record store error.
    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    /// Source tree serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
