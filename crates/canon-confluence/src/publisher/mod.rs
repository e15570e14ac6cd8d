//! Chapter publisher for Confluence.
//!
//! [`ChapterPublisher`] runs the read-modify-write cycle that places a
//! rendered chapter into a page:
//!
//! 1. Render the chapter tree and convert it to storage format
//! 2. Fetch the current page body and version
//! 3. Replace the chapter's region, or append one
//! 4. Update the page with `version + 1`
//! 5. Record hashes of what was published
//!
//! The new body is computed in memory before the single update call, so a
//! failed update leaves the page untouched. A version conflict restarts from
//! step 2, at most `max_retries` times.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use canon_config::PublishConfig;
//! use canon_confluence::{ChapterInput, ChapterPublisher, ConfluenceClient};
//! use canon_store::FileStore;
//!
//! let client = ConfluenceClient::new("https://example.atlassian.net/wiki", Some("bot"), "token");
//! let store = FileStore::open(".canon")?;
//! let publisher = ChapterPublisher::new(&client, &store, PublishConfig::default());
//!
//! let source = canon_tree::decode_document(r#"{"type":"doc","content":[]}"#)?;
//! let chapter: ChapterInput = serde_json::from_str(r#"{"local_id":"intro","source_id":"std-1"}"#)?;
//! let result = publisher.publish("123", &source, &chapter)?;
//! println!("page now at version {}", result.page.version.number);
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
#[cfg(test)]
mod mock;
mod result;

pub use error::PublishError;
pub use executor::ChapterPublisher;
pub use result::{
    BulkItem, BulkReport, ChapterStatus, DryRunResult, PlaceholderOutcome, PublishResult,
    PublishedRecord, RemoveOutcome,
};

/// Store key of the publish record for a chapter.
#[must_use]
pub fn record_key(page_id: &str, local_id: &str) -> String {
    format!("chapters/{page_id}/{local_id}")
}
