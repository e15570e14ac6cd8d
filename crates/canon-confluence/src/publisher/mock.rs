//! In-memory Confluence for publisher tests.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;

use canon_tree::Node;

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::{Body, Page, Storage, Version};

/// Single-page Confluence with optimistic versioning.
pub(crate) struct MockConfluence {
    page: RefCell<Page>,
    /// Number of upcoming fetches after which another writer bumps the version.
    concurrent_edits: Cell<u32>,
    fail_conversion: Cell<bool>,
    updates: Cell<u32>,
}

impl MockConfluence {
    pub(crate) fn new(body: &str) -> Self {
        Self {
            page: RefCell::new(Page {
                id: "100".to_owned(),
                content_type: "page".to_owned(),
                title: "Security Handbook".to_owned(),
                version: Version {
                    number: 1,
                    message: None,
                },
                body: Some(Body {
                    storage: Some(Storage {
                        value: body.to_owned(),
                        representation: "storage".to_owned(),
                    }),
                }),
            }),
            concurrent_edits: Cell::new(0),
            fail_conversion: Cell::new(false),
            updates: Cell::new(0),
        }
    }

    /// Simulate another writer saving the page after each of the next `n` fetches.
    pub(crate) fn with_concurrent_edits(self, n: u32) -> Self {
        self.concurrent_edits.set(n);
        self
    }

    pub(crate) fn with_failing_conversion(self) -> Self {
        self.fail_conversion.set(true);
        self
    }

    pub(crate) fn body(&self) -> String {
        self.page.borrow().storage_html().to_owned()
    }

    pub(crate) fn version(&self) -> u32 {
        self.page.borrow().version.number
    }

    pub(crate) fn updates(&self) -> u32 {
        self.updates.get()
    }

    /// Replace the body as an editor would, bumping the version.
    pub(crate) fn edit(&self, body: &str) {
        let mut page = self.page.borrow_mut();
        page.version.number += 1;
        if let Some(storage) = page.body.as_mut().and_then(|b| b.storage.as_mut()) {
            body.clone_into(&mut storage.value);
        }
    }
}

impl ConfluenceApi for MockConfluence {
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        let page = self.page.borrow().clone();
        if page.id != page_id {
            return Err(ConfluenceError::HttpResponse {
                status: 404,
                body: format!("no page {page_id}"),
            });
        }
        let pending = self.concurrent_edits.get();
        if pending > 0 {
            self.concurrent_edits.set(pending - 1);
            self.page.borrow_mut().version.number += 1;
        }
        Ok(page)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let mut page = self.page.borrow_mut();
        if page.version.number != version {
            return Err(ConfluenceError::Conflict {
                page_id: page_id.to_owned(),
                version: version + 1,
            });
        }
        title.clone_into(&mut page.title);
        page.version = Version {
            number: version + 1,
            message: message.map(str::to_owned),
        };
        page.body = Some(Body {
            storage: Some(Storage {
                value: body.to_owned(),
                representation: "storage".to_owned(),
            }),
        });
        self.updates.set(self.updates.get() + 1);
        Ok(page.clone())
    }

    fn convert_to_storage(&self, doc: &Node) -> Result<String, ConfluenceError> {
        if self.fail_conversion.get() {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: "invalid ADF".to_owned(),
            });
        }
        let mut html = String::new();
        for child in doc.children() {
            let _ = write!(html, "<p>{}</p>", child.text_content());
        }
        Ok(html)
    }
}
