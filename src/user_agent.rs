//! Shared User-Agent string for page-fetch and download HTTP clients.
//!
//! Single source for the UA so page and file traffic present the same
//! browser identity to servers that gate on it.

/// Browser User-Agent sent on every request.
///
/// Some document hosts return 403 or an interstitial page to non-browser
/// clients; a current Chrome identity keeps them serving the real content.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_ua_looks_like_a_browser() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(BROWSER_USER_AGENT.contains("Chrome"));
    }
}
