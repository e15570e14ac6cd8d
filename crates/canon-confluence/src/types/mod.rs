//! Confluence REST API types.

mod page;

pub use page::{Body, Page, Storage, Version};
