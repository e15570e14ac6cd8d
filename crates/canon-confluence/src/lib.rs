//! Confluence integration for embedded standards.
//!
//! A standard is published into a Confluence page as a *chapter*: the
//! customized document tree, converted to storage format and delimited by
//! boundary markers so later publishes can find and replace it.
//!
//! - [`boundary`]: locating, replacing and removing chapter regions
//! - [`ChapterInput`]: per-embed customizations and the rendered chapter tree
//! - [`ChapterPublisher`]: the publish lifecycle against a [`ConfluenceApi`]
//! - [`ConfluenceClient`]: the REST implementation of [`ConfluenceApi`]

mod api;
pub mod boundary;
mod chapter;
mod client;
mod error;
mod hash;
mod publisher;
mod types;

pub use api::ConfluenceApi;
pub use chapter::ChapterInput;
pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use hash::{content_hash, source_hash};
pub use publisher::{
    BulkItem, BulkReport, ChapterPublisher, ChapterStatus, DryRunResult, PlaceholderOutcome,
    PublishError, PublishResult, PublishedRecord, RemoveOutcome, record_key,
};
pub use types::{Body, Page, Storage, Version};
