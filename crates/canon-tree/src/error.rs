//! Error types for document decoding.

/// Error while decoding a document tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError {
    /// Input is not valid JSON or does not have the node shape.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Root node is not a document.
    #[error("expected a `doc` root node, found `{found}`")]
    NotADocument {
        /// Kind of the root node that was found.
        found: String,
    },
}
