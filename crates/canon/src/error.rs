//! CLI error types.

use canon_config::ConfigError;
use canon_confluence::{ConfluenceError, PublishError};
use canon_store::StoreError;
use canon_tree::TreeError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{path}: {source}")]
    Input {
        path: String,
        #[source]
        source: Box<CliError>,
    },

    #[error("{0}")]
    Validation(String),
}
