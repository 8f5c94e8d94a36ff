//! Request and response bodies for the HTTP front-end.

use serde::{Deserialize, Serialize};

use crate::extract::PdfLink;

/// Body of `POST /start`.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    /// Page to scrape. Optional in the wire shape so a missing field maps to
    /// the "No URL provided" error rather than a deserialization failure.
    #[serde(default)]
    pub url: Option<String>,
    /// Optional output folder; `~` expands to the user's home directory.
    #[serde(default)]
    pub folder: Option<String>,
}

/// Body of a successful `POST /start`: `{"status":"started"}`.
#[derive(Debug, Serialize)]
pub struct StartedResponse {
    /// Always `"started"`.
    pub status: &'static str,
}

impl StartedResponse {
    pub(crate) fn new() -> Self {
        Self { status: "started" }
    }
}

/// Body of `POST /scan`.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Page to scan for PDF links.
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a successful `POST /scan`.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// Discovered links as `{url, name}` pairs.
    pub pdfs: Vec<PdfLink>,
    /// Number of discovered links.
    pub count: usize,
}

/// Error body shared by all endpoints: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
