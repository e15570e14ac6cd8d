//! Chapter publisher implementation.

use canon_config::PublishConfig;
use canon_store::{Store, StoreExt};
use canon_tree::Node;
use tracing::{debug, info, warn};

use crate::api::ConfluenceApi;
use crate::boundary::{self, BoundaryScheme};
use crate::chapter::ChapterInput;
use crate::hash::{content_hash, source_hash};
use crate::types::Page;

use super::error::PublishError;
use super::record_key;
use super::result::{
    BulkItem, BulkReport, ChapterStatus, DryRunResult, PlaceholderOutcome, PublishResult,
    PublishedRecord, RemoveOutcome,
};

/// A successful page update.
struct Written {
    page: Page,
    attempts: u32,
}

/// Publishes, removes and inspects chapters on Confluence pages.
pub struct ChapterPublisher<'a, A: ConfluenceApi + ?Sized> {
    api: &'a A,
    store: &'a dyn Store,
    config: PublishConfig,
}

impl<'a, A: ConfluenceApi + ?Sized> ChapterPublisher<'a, A> {
    /// Create a new chapter publisher.
    #[must_use]
    pub fn new(api: &'a A, store: &'a dyn Store, config: PublishConfig) -> Self {
        Self { api, store, config }
    }

    /// Publish a chapter rendered from `source` into page `page_id`.
    ///
    /// Replaces the chapter's region when present (in either marker scheme;
    /// legacy regions are rewritten with current markers) and appends it
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the local id is not embeddable ([`PublishError::InvalidLocalId`])
    /// - conversion fails ([`PublishError::ConversionFailed`]); nothing is written
    /// - the page keeps changing ([`PublishError::ConflictRetriesExhausted`])
    /// - Confluence API calls or the record store fail
    pub fn publish(
        &self,
        page_id: &str,
        source: &Node,
        chapter: &ChapterInput,
    ) -> Result<PublishResult, PublishError> {
        let local_id = chapter.local_id.as_str();
        check_local_id(local_id)?;

        let storage_html = self.convert(source, chapter)?;
        let region_html = boundary::wrap_chapter(local_id, &storage_html);

        let mut replaced_scheme = None;
        let written = self.modify_page_always(page_id, |body| {
            let (new_body, scheme) = splice(body, local_id, &region_html);
            replaced_scheme = scheme;
            new_body
        })?;

        let record = PublishedRecord {
            published_content_hash: content_hash(&storage_html),
            published_source_content_hash: source_hash(source)?,
            published_version: written.page.version.number,
        };
        self.store
            .set_json(&record_key(page_id, local_id), &record)?;

        info!(
            page_id,
            local_id,
            version = record.published_version,
            created = replaced_scheme.is_none(),
            "Published chapter"
        );

        Ok(PublishResult {
            local_id: local_id.to_owned(),
            page: written.page,
            created: replaced_scheme.is_none(),
            replaced_scheme,
            attempts: written.attempts,
            record,
        })
    }

    /// Compute what [`publish`](Self::publish) would write, without writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the local id is invalid, conversion fails or the
    /// page cannot be fetched.
    pub fn dry_run(
        &self,
        page_id: &str,
        source: &Node,
        chapter: &ChapterInput,
    ) -> Result<DryRunResult, PublishError> {
        let local_id = chapter.local_id.as_str();
        check_local_id(local_id)?;

        let storage_html = self.convert(source, chapter)?;
        let region_html = boundary::wrap_chapter(local_id, &storage_html);

        let current = self.api.get_page(page_id)?;
        let (body, existing_scheme) = splice(current.storage_html(), local_id, &region_html);

        Ok(DryRunResult {
            local_id: local_id.to_owned(),
            region_html,
            body,
            current_title: current.title,
            current_version: current.version.number,
            existing_scheme,
        })
    }

    /// Publish several chapters into one page, one update per chapter.
    ///
    /// A failing chapter does not stop the others; the report has one result
    /// per input, in order.
    pub fn publish_all(&self, page_id: &str, chapters: &[(Node, ChapterInput)]) -> BulkReport {
        let items = chapters
            .iter()
            .map(|(source, chapter)| {
                let result = self.publish(page_id, source, chapter);
                if let Err(e) = &result {
                    warn!(page_id, local_id = %chapter.local_id, error = %e, "Chapter publish failed");
                }
                BulkItem {
                    local_id: chapter.local_id.clone(),
                    result,
                }
            })
            .collect();
        BulkReport { items }
    }

    /// Append an unpublished stub for a chapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the local id is invalid or the page update fails.
    pub fn insert_placeholder(
        &self,
        page_id: &str,
        local_id: &str,
        heading: &str,
    ) -> Result<PlaceholderOutcome, PublishError> {
        check_local_id(local_id)?;
        let stub = boundary::placeholder_region(local_id, heading);

        let written = self.modify_page(page_id, |body| {
            (!boundary::exists(body, local_id)).then(|| boundary::append(body, &stub))
        })?;

        Ok(match written {
            Some(written) => {
                info!(page_id, local_id, "Inserted chapter placeholder");
                PlaceholderOutcome::Inserted {
                    version: written.page.version.number,
                }
            }
            None => PlaceholderOutcome::AlreadyPresent,
        })
    }

    /// Remove a chapter's region and its publish record.
    ///
    /// A chapter that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the page update or the record store fails.
    pub fn remove(&self, page_id: &str, local_id: &str) -> Result<RemoveOutcome, PublishError> {
        let written = self.modify_page(page_id, |body| boundary::remove(body, local_id))?;
        self.store.delete(&record_key(page_id, local_id))?;

        Ok(match written {
            Some(written) => {
                info!(page_id, local_id, "Removed chapter");
                RemoveOutcome::Removed {
                    version: written.page.version.number,
                }
            }
            None => {
                debug!(page_id, local_id, "Chapter already absent");
                RemoveOutcome::AlreadyAbsent
            }
        })
    }

    /// Lifecycle state of a chapter, comparing the stored source hash with `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or the record cannot be read.
    pub fn status(
        &self,
        page_id: &str,
        local_id: &str,
        source: &Node,
    ) -> Result<ChapterStatus, PublishError> {
        let page = self.api.get_page(page_id)?;
        let Some(region) = boundary::locate(page.storage_html(), local_id) else {
            return Ok(ChapterStatus::Absent);
        };
        if region.is_placeholder() {
            return Ok(ChapterStatus::Placeholder);
        }

        let record: Option<PublishedRecord> =
            self.store.get_json(&record_key(page_id, local_id))?;
        Ok(match record {
            Some(record) => ChapterStatus::Published {
                stale: record.published_source_content_hash != source_hash(source)?,
                version: record.published_version,
            },
            None => ChapterStatus::Untracked,
        })
    }

    /// Local ids of every chapter on the page, in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    pub fn list(&self, page_id: &str) -> Result<Vec<String>, PublishError> {
        let page = self.api.get_page(page_id)?;
        Ok(boundary::enumerate(page.storage_html()))
    }

    fn convert(&self, source: &Node, chapter: &ChapterInput) -> Result<String, PublishError> {
        let tree = chapter.render(source, &self.config.notes_title);
        self.api
            .convert_to_storage(&tree)
            .map_err(|e| PublishError::ConversionFailed(e.to_string()))
    }

    /// Fetch, edit and update a page, retrying on version conflicts.
    ///
    /// `edit` receives the current body and returns the new one, or `None`
    /// when there is nothing to write. It runs again on every retry.
    fn modify_page(
        &self,
        page_id: &str,
        mut edit: impl FnMut(&str) -> Option<String>,
    ) -> Result<Option<Written>, PublishError> {
        let max_attempts = self.config.max_retries + 1;
        for attempt in 1..=max_attempts {
            let current = self.api.get_page(page_id)?;
            let Some(body) = edit(current.storage_html()) else {
                return Ok(None);
            };
            if let Some(written) = self.try_update(&current, page_id, &body, attempt)? {
                return Ok(Some(written));
            }
        }
        Err(retries_exhausted(page_id, max_attempts))
    }

    /// Like [`modify_page`](Self::modify_page) for edits that always write.
    fn modify_page_always(
        &self,
        page_id: &str,
        mut edit: impl FnMut(&str) -> String,
    ) -> Result<Written, PublishError> {
        let max_attempts = self.config.max_retries + 1;
        for attempt in 1..=max_attempts {
            let current = self.api.get_page(page_id)?;
            let body = edit(current.storage_html());
            if let Some(written) = self.try_update(&current, page_id, &body, attempt)? {
                return Ok(written);
            }
        }
        Err(retries_exhausted(page_id, max_attempts))
    }

    /// Submit `body` on top of `current`; `None` on a version conflict.
    fn try_update(
        &self,
        current: &Page,
        page_id: &str,
        body: &str,
        attempt: u32,
    ) -> Result<Option<Written>, PublishError> {
        match self.api.update_page(
            page_id,
            &current.title,
            body,
            current.version.number,
            self.config.version_message.as_deref(),
        ) {
            Ok(page) => Ok(Some(Written { page, attempts: attempt })),
            Err(e) if e.is_conflict() => {
                warn!(page_id, attempt, "Version conflict, re-fetching page");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn retries_exhausted(page_id: &str, attempts: u32) -> PublishError {
    PublishError::ConflictRetriesExhausted {
        page_id: page_id.to_owned(),
        attempts,
    }
}

fn check_local_id(local_id: &str) -> Result<(), PublishError> {
    if boundary::is_valid_local_id(local_id) {
        Ok(())
    } else {
        Err(PublishError::InvalidLocalId {
            local_id: local_id.to_owned(),
        })
    }
}

/// Replace the chapter's region or append it; returns the scheme replaced.
fn splice(body: &str, local_id: &str, region_html: &str) -> (String, Option<BoundaryScheme>) {
    let scheme = boundary::locate(body, local_id).map(|region| region.scheme);
    let spliced = boundary::replace(body, local_id, region_html)
        .unwrap_or_else(|| boundary::append(body, region_html));
    (spliced, scheme)
}
