//! PDF link extraction from collected anchor hrefs.
//!
//! Resolves every href against the page URL, keeps the ones whose path ends
//! in `.pdf`, and deduplicates by absolute URL. Pure functions; fetching and
//! HTML parsing live in [`crate::page`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::trace;
use url::Url;

/// Fallback name when a link's URL path has no usable final segment.
pub const FALLBACK_NAME: &str = "document.pdf";

/// One discovered PDF link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfLink {
    /// Absolute URL of the document.
    pub url: String,
    /// Display name derived from the URL's final path segment.
    pub name: String,
}

/// Extracts the deduplicated PDF links from a page's anchor hrefs.
///
/// Each href is resolved against `page_url`, so relative, protocol-relative,
/// and absolute hrefs all normalize to absolute URLs. A resolved URL is kept
/// only when its path component ends in `.pdf` case-insensitively; query
/// strings and fragments do not defeat the check. Duplicates (by exact
/// absolute URL) are dropped, first occurrence wins, so the result order is
/// first-seen order.
#[must_use]
pub fn extract_pdf_links<I, S>(page_url: &Url, hrefs: I) -> Vec<PdfLink>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let href = href.as_ref();
        let Ok(resolved) = page_url.join(href) else {
            trace!(href, "skipping unresolvable href");
            continue;
        };

        if !resolved.path().to_ascii_lowercase().ends_with(".pdf") {
            continue;
        }

        let absolute = resolved.to_string();
        if !seen.insert(absolute.clone()) {
            continue;
        }

        let name = link_name(&resolved);
        trace!(url = %absolute, name = %name, "PDF link found");
        links.push(PdfLink {
            url: absolute,
            name,
        });
    }

    links
}

/// Display name for a link: final path segment, percent-decoded.
fn link_name(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    if last.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    urlencoding::decode(last)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| last.to_string())
}
