//! Page operations for Confluence API.

use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, read_json};
use crate::error::ConfluenceError;
use crate::types::Page;

/// HTTP status Confluence returns when the submitted version is stale.
const STATUS_CONFLICT: u16 = 409;

impl ConfluenceClient {
    /// Get page by ID with optional field expansion.
    pub(super) fn fetch_page(&self, page_id: &str, expand: &[&str]) -> Result<Page, ConfluenceError> {
        let mut url = format!("{}/content/{}", self.api_url(), page_id);

        if !expand.is_empty() {
            url.push_str("?expand=");
            url.push_str(&expand.join(","));
        }

        info!(page_id, "Getting page");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .call()?;

        read_json(response)
    }

    /// Update existing page (auto-increments version).
    pub(super) fn put_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let mut payload = json!({
            "type": "page",
            "title": title,
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            },
            "version": {"number": version + 1}
        });

        if let Some(msg) = message {
            payload["version"]["message"] = json!(msg);
        }

        info!(page_id, from = version, to = version + 1, "Updating page");

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        if response.status().as_u16() == STATUS_CONFLICT {
            return Err(ConfluenceError::Conflict {
                page_id: page_id.to_owned(),
                version: version + 1,
            });
        }

        let page: Page = read_json(response)?;
        info!(page_id, version = page.version.number, "Updated page");
        Ok(page)
    }
}
