//! The run coordinator: fetch a page, extract its PDF links, download each.
//!
//! One [`Scraper`] drives both deployment shapes. The synchronous form
//! ([`Scraper::run`]) blocks until the run finishes and returns a
//! [`ScrapeReport`]; the asynchronous form ([`RunController`]) spawns the same
//! routine on a background task and exposes polled [`RunStatus`] snapshots.

mod controller;
mod status;

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};
use url::Url;

use crate::download::{HttpClient, filename_from_url, resolve_unique_path};
use crate::extract::{PdfLink, extract_pdf_links};
use crate::page::{FetchError, PageClient, anchor_hrefs};

pub use controller::{RunController, StartError};
pub use status::{DownloadOutcome, OutcomeStatus, RunStatus, StatusHandle};

/// Informational message recorded when a page has no PDF links.
///
/// This is a normal empty-result terminal state, not a failure.
pub const NO_LINKS_MESSAGE: &str = "No PDF links found on this page";

/// Default output folder name, created beside the running program.
pub const DEFAULT_FOLDER: &str = "Downloaded_PDFs";

/// Drives one scraping run: page fetch, link extraction, downloads.
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    pages: PageClient,
    files: HttpClient,
}

/// Aggregated result of a synchronous run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Number of PDF links discovered on the page.
    pub found: usize,
    /// Per-link outcomes, in processing order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Run-level errors and informational messages.
    pub errors: Vec<String>,
}

impl ScrapeReport {
    /// Number of successful downloads.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.downloaded()
    }
}

impl From<RunStatus> for ScrapeReport {
    fn from(status: RunStatus) -> Self {
        Self {
            found: status.found_count,
            outcomes: status.outcomes,
            errors: status.errors,
        }
    }
}

/// Per-file progress events delivered to a run observer.
///
/// The CLI turns these into its progress log; the dashboard ignores them and
/// polls [`RunStatus`] instead.
#[derive(Debug, Clone, Copy)]
pub enum RunProgress<'a> {
    /// A download is about to start for the named link.
    Downloading {
        /// Display name of the link being fetched.
        name: &'a str,
    },
    /// A download attempt finished.
    Finished {
        /// The recorded outcome, including final name and size.
        outcome: &'a DownloadOutcome,
    },
}

impl Scraper {
    /// Creates a scraper with default page and download clients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scraper with explicit page and download timeouts.
    #[must_use]
    pub fn with_timeouts(page_timeout_secs: u64, download_timeout_secs: u64) -> Self {
        Self {
            pages: PageClient::with_timeout(page_timeout_secs),
            files: HttpClient::with_timeout(download_timeout_secs),
        }
    }

    /// Fetches a page and returns its PDF links without downloading anything.
    ///
    /// The input URL is normalized first (bare hosts get an `https://`
    /// prefix).
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the page cannot be retrieved.
    pub async fn scan(&self, target: &str) -> Result<Vec<PdfLink>, FetchError> {
        let url = normalize_target_url(target);
        let base = Url::parse(&url).map_err(|_| FetchError::InvalidUrl { url: url.clone() })?;
        let html = self.pages.fetch_html(&url).await?;
        Ok(extract_pdf_links(&base, anchor_hrefs(&html)))
    }

    /// Runs a complete scrape synchronously and returns the report.
    ///
    /// `folder` may contain `~`; when `None`, downloads land in
    /// [`DEFAULT_FOLDER`] beside the running program.
    pub async fn run(&self, target: &str, folder: Option<&str>) -> ScrapeReport {
        self.run_with_observer(target, folder, |_| {}).await
    }

    /// Runs a complete scrape, delivering a [`RunProgress`] event as each
    /// download starts and finishes.
    pub async fn run_with_observer<F>(
        &self,
        target: &str,
        folder: Option<&str>,
        mut on_progress: F,
    ) -> ScrapeReport
    where
        F: FnMut(RunProgress<'_>),
    {
        let url = normalize_target_url(target);
        let status = StatusHandle::new();
        // A fresh handle is never running, so the claim cannot fail.
        let _ = status.try_begin(&url);
        self.execute_inner(&url, folder, &status, &mut on_progress)
            .await;
        ScrapeReport::from(status.snapshot())
    }

    /// The shared run routine. `status` must already be claimed via
    /// [`StatusHandle::try_begin`]; this always finishes it.
    pub(crate) async fn execute(&self, url: &str, folder: Option<&str>, status: &StatusHandle) {
        self.execute_inner(url, folder, status, &mut |_| {}).await;
    }

    #[instrument(skip(self, status, on_progress), fields(url = %url))]
    async fn execute_inner<F>(
        &self,
        url: &str,
        folder: Option<&str>,
        status: &StatusHandle,
        on_progress: &mut F,
    ) where
        F: FnMut(RunProgress<'_>),
    {
        let output_dir = resolve_output_dir(folder);
        status.set_output_folder(&output_dir.display().to_string());

        if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
            status.record_error(format!(
                "could not create output folder {}: {e}",
                output_dir.display()
            ));
            status.finish();
            return;
        }
        info!(folder = %output_dir.display(), "output folder ready");

        let links = match self.fetch_links(url).await {
            Ok(links) => links,
            Err(e) => {
                warn!(error = %e, "page fetch failed");
                status.record_error(e.to_string());
                status.finish();
                return;
            }
        };

        if links.is_empty() {
            info!("no PDF links on page");
            status.record_error(NO_LINKS_MESSAGE);
            status.finish();
            return;
        }

        status.set_found(links.len());
        info!(found = links.len(), "PDF links found");

        for link in links {
            on_progress(RunProgress::Downloading { name: &link.name });
            let outcome = self.download_link(&link, &output_dir).await;
            on_progress(RunProgress::Finished { outcome: &outcome });
            status.record_outcome(outcome);
        }

        status.finish();
    }

    async fn fetch_links(&self, url: &str) -> Result<Vec<PdfLink>, FetchError> {
        let base = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        let html = self.pages.fetch_html(url).await?;
        Ok(extract_pdf_links(&base, anchor_hrefs(&html)))
    }

    /// Downloads one link into `output_dir` and returns its outcome.
    ///
    /// Failures are isolated here: one failing file never aborts the run.
    async fn download_link(&self, link: &PdfLink, output_dir: &Path) -> DownloadOutcome {
        let filename = filename_from_url(&link.url);
        let destination = resolve_unique_path(output_dir, &filename);
        let name = destination
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .map_or_else(|| filename.clone(), std::string::ToString::to_string);

        match self.files.download_to_path(&link.url, &destination).await {
            Ok(bytes) => {
                info!(name = %name, bytes, "saved");
                DownloadOutcome::success(name, bytes)
            }
            Err(e) => {
                warn!(name = %name, error = %e, "download failed");
                DownloadOutcome::failure(name, e.to_string())
            }
        }
    }
}

/// Normalizes user input into a fetchable URL.
///
/// Bare hosts (`example.com/docs`) get an `https://` prefix; inputs that
/// already carry `http://` or `https://` pass through unchanged.
#[must_use]
pub fn normalize_target_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Resolves the output directory from an optional user-supplied folder.
///
/// Expands `~` to the invoking user's home directory. With no folder, uses
/// [`DEFAULT_FOLDER`] beside the running program (falling back to the working
/// directory when the executable path is unavailable).
#[must_use]
pub fn resolve_output_dir(folder: Option<&str>) -> PathBuf {
    match folder {
        Some(folder) if !folder.trim().is_empty() => {
            PathBuf::from(shellexpand::tilde(folder.trim()).into_owned())
        }
        _ => default_output_dir(),
    }
}

fn default_output_dir() -> PathBuf {
    let base = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(DEFAULT_FOLDER)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_http_and_https() {
        assert_eq!(
            normalize_target_url("https://example.com/docs"),
            "https://example.com/docs"
        );
        assert_eq!(
            normalize_target_url("http://example.com"),
            "http://example.com"
        );
    }

    #[test]
    fn test_normalize_prefixes_bare_host() {
        assert_eq!(
            normalize_target_url("example.com/docs"),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_target_url("  example.com  "),
            "https://example.com"
        );
    }

    #[test]
    fn test_resolve_output_dir_expands_tilde() {
        let resolved = resolve_output_dir(Some("~/pdfs"));
        assert!(
            !resolved.to_string_lossy().starts_with('~'),
            "tilde must be expanded, got: {}",
            resolved.display()
        );
        assert!(resolved.ends_with("pdfs"));
    }

    #[test]
    fn test_resolve_output_dir_passes_plain_paths_through() {
        assert_eq!(
            resolve_output_dir(Some("/tmp/out")),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn test_resolve_output_dir_default_ends_with_folder_name() {
        for input in [None, Some(""), Some("   ")] {
            let resolved = resolve_output_dir(input);
            assert!(
                resolved.ends_with(DEFAULT_FOLDER),
                "expected default folder for {input:?}, got: {}",
                resolved.display()
            );
        }
    }

    #[test]
    fn test_report_counts_split_outcomes() {
        let report = ScrapeReport {
            found: 3,
            outcomes: vec![
                DownloadOutcome::success("a.pdf", 10),
                DownloadOutcome::failure("b.pdf", "HTTP 404"),
                DownloadOutcome::success("c.pdf", 20),
            ],
            errors: vec![],
        };
        assert_eq!(report.downloaded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.found, report.downloaded() + report.failed());
    }
}
