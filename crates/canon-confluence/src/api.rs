//! The Confluence operations the publisher depends on.

use canon_tree::Node;

use crate::error::ConfluenceError;
use crate::types::Page;

/// Remote page store with optimistic versioning.
///
/// Implemented by [`ConfluenceClient`](crate::ConfluenceClient) for the REST
/// API. Callers treat [`ConfluenceError::Conflict`] from
/// [`update_page`](Self::update_page) as retryable.
pub trait ConfluenceApi {
    /// Fetch a page with its storage body and version.
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError>;

    /// Replace the page body, submitting `version + 1`.
    ///
    /// `version` is the version the body was computed from. If the page moved
    /// past it in the meantime the update is rejected with
    /// [`ConfluenceError::Conflict`] and nothing is written.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Convert a document tree to storage-format markup.
    fn convert_to_storage(&self, doc: &Node) -> Result<String, ConfluenceError>;
}
