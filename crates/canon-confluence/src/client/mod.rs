//! Confluence REST API client.
//!
//! Provides sync HTTP client for the Confluence REST API with basic
//! (user + API token) or bearer (personal access token) authentication.

mod convert;
mod pages;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use canon_config::ConfluenceConfig;
use canon_tree::Node;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::api::ConfluenceApi;
use crate::error::ConfluenceError;
use crate::types::Page;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    authorization: String,
}

impl ConfluenceClient {
    /// Create a client.
    ///
    /// With a `username` the token is sent as HTTP basic auth (Confluence
    /// Cloud API tokens), otherwise as a bearer token (Data Center personal
    /// access tokens).
    #[must_use]
    pub fn new(base_url: &str, username: Option<&str>, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let authorization = match username {
            Some(user) => format!(
                "Basic {}",
                BASE64_STANDARD.encode(format!("{user}:{api_token}"))
            ),
            None => format!("Bearer {api_token}"),
        };

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            authorization,
        }
    }

    /// Create a client from the `[confluence]` config section.
    #[must_use]
    pub fn from_config(config: &ConfluenceConfig) -> Self {
        Self::new(
            &config.base_url,
            config.username.as_deref(),
            &config.api_token,
        )
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }
}

/// Read a JSON response body, turning error statuses into [`ConfluenceError::HttpResponse`].
fn read_json<T: DeserializeOwned>(
    response: ureq::http::Response<ureq::Body>,
) -> Result<T, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body_reader.read_json()?)
}

impl ConfluenceApi for ConfluenceClient {
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.fetch_page(page_id, &["body.storage", "version"])
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        version: u32,
        message: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        self.put_page(page_id, title, body, version, message)
    }

    fn convert_to_storage(&self, doc: &Node) -> Result<String, ConfluenceError> {
        self.convert_adf(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let client = ConfluenceClient::new("https://x.atlassian.net/wiki/", Some("me@x.io"), "tok");
        assert_eq!(
            client.authorization,
            format!("Basic {}", BASE64_STANDARD.encode("me@x.io:tok"))
        );
        assert_eq!(client.api_url(), "https://x.atlassian.net/wiki/rest/api");
    }

    #[test]
    fn test_bearer_auth_header() {
        let client = ConfluenceClient::new("https://confluence.local", None, "pat");
        assert_eq!(client.authorization, "Bearer pat");
    }
}
