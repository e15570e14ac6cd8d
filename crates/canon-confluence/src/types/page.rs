//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
}

impl Page {
    /// Storage-format body, empty when the page was fetched without it.
    #[must_use]
    pub fn storage_html(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_deserializes_from_rest_response() {
        let page: Page = serde_json::from_value(json!({
            "id": "42",
            "type": "page",
            "title": "Security Policy",
            "version": {"number": 7},
            "body": {"storage": {"value": "<p>x</p>", "representation": "storage"}},
            "_links": {"webui": "/pages/42"}
        }))
        .unwrap();
        assert_eq!(page.version.number, 7);
        assert_eq!(page.storage_html(), "<p>x</p>");
    }

    #[test]
    fn test_page_without_body() {
        let page: Page = serde_json::from_value(json!({
            "id": "42",
            "type": "page",
            "title": "t",
            "version": {"number": 1}
        }))
        .unwrap();
        assert_eq!(page.storage_html(), "");
    }
}
