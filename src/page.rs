//! Page fetching and anchor collection.
//!
//! Fetches a page's HTML with a browser User-Agent and walks its `<a>`
//! elements. Link filtering happens later in [`crate::extract`]; this module
//! reports every href as it appears in the document.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::user_agent::BROWSER_USER_AGENT;

/// Default total timeout for a page fetch (30 seconds).
pub const PAGE_TIMEOUT_SECS: u64 = 30;

/// Anchor selector, parsed once.
#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector is valid")); // Static pattern, safe to panic

/// Errors that can occur while retrieving a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to fetch.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the body arrived.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// HTTP client for retrieving page HTML.
///
/// Created once and reused so connection pooling applies when a run fetches
/// the page and then downloads files from the same host.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClient {
    /// Creates a page client with the default 30-second timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(PAGE_TIMEOUT_SECS)
    }

    /// Creates a page client with an explicit total timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied timeout.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches a page and returns its HTML body.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the URL is invalid, the request fails
    /// (network error, timeout), or the server returns a non-2xx status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_request(url, e))?;
        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }
}

/// Collects the `href` attribute of every `<a>` element, in document order.
///
/// Anchors without an `href` are skipped. No filtering or resolution happens
/// here.
#[must_use]
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(std::string::ToString::to_string)
        .collect()
}
