//! Result types for chapter publishing.

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryScheme;
use crate::types::Page;

use super::error::PublishError;

/// What was published, kept for staleness detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRecord {
    /// Hash of the storage markup written into the region.
    pub published_content_hash: String,
    /// Hash of the source standard the markup was rendered from.
    pub published_source_content_hash: String,
    /// Page version produced by the update.
    pub published_version: u32,
}

/// Result of publishing one chapter.
#[derive(Debug)]
pub struct PublishResult {
    /// Chapter that was published.
    pub local_id: String,
    /// Updated page.
    pub page: Page,
    /// Whether the region was appended (`true`) or replaced in place.
    pub created: bool,
    /// Scheme of the replaced region; `None` when appended.
    pub replaced_scheme: Option<BoundaryScheme>,
    /// Update attempts, 1 when no conflict occurred.
    pub attempts: u32,
    /// Record persisted for the chapter.
    pub record: PublishedRecord,
}

/// Result of a dry-run publish (no changes made).
#[derive(Debug)]
pub struct DryRunResult {
    /// Chapter that would be published.
    pub local_id: String,
    /// Region markup, markers included.
    pub region_html: String,
    /// Full page body after the splice.
    pub body: String,
    /// Current page title.
    pub current_title: String,
    /// Current page version.
    pub current_version: u32,
    /// Scheme of the region that would be replaced; `None` when it would be appended.
    pub existing_scheme: Option<BoundaryScheme>,
}

/// Outcome of removing a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The region was cut out; the page is now at `version`.
    Removed {
        /// New page version.
        version: u32,
    },
    /// The page had no such region; nothing was written.
    AlreadyAbsent,
}

/// Outcome of inserting a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderOutcome {
    /// The stub was appended; the page is now at `version`.
    Inserted {
        /// New page version.
        version: u32,
    },
    /// The chapter already has a region; nothing was written.
    AlreadyPresent,
}

/// Lifecycle state of a chapter on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    /// No region on the page.
    Absent,
    /// Unpublished stub.
    Placeholder,
    /// Region present but no publish record exists for it.
    Untracked,
    /// Published content.
    Published {
        /// Whether the source changed since publishing.
        stale: bool,
        /// Page version produced by the last publish.
        version: u32,
    },
}

/// Per-chapter outcome of a bulk publish.
#[derive(Debug)]
pub struct BulkItem {
    /// Chapter the result belongs to.
    pub local_id: String,
    /// Outcome for this chapter alone.
    pub result: Result<PublishResult, PublishError>,
}

/// Results of [`publish_all`](super::ChapterPublisher::publish_all), in input order.
#[derive(Debug, Default)]
pub struct BulkReport {
    /// One entry per chapter.
    pub items: Vec<BulkItem>,
}

impl BulkReport {
    /// Number of chapters published.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    /// Chapters that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PublishError)> {
        self.items
            .iter()
            .filter_map(|i| i.result.as_ref().err().map(|e| (i.local_id.as_str(), e)))
    }

    /// Whether every chapter was published.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.items.iter().all(|i| i.result.is_ok())
    }
}
