//! Document conversion through the Confluence content body API.

use canon_tree::Node;
use serde_json::json;
use tracing::debug;

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::Storage;

/// Representation name of document trees in the content body API.
const ADF_REPRESENTATION: &str = "atlas_doc_format";

impl ConfluenceClient {
    /// Convert a document tree to storage format.
    pub(super) fn convert_adf(&self, doc: &Node) -> Result<String, ConfluenceError> {
        let url = format!("{}/contentbody/convert/storage", self.api_url());

        let payload = json!({
            "value": serde_json::to_string(doc)?,
            "representation": ADF_REPRESENTATION
        });
        let payload_bytes = serde_json::to_vec(&payload)?;

        debug!(bytes = payload_bytes.len(), "Converting document to storage format");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let storage: Storage = read_json(response)?;
        Ok(storage.value)
    }
}
