//! Run status bookkeeping shared between the coordinator and pollers.
//!
//! One [`RunStatus`] record exists per [`StatusHandle`]. The coordinator task
//! is the only writer; pollers get cloned snapshots. Compound updates (bump a
//! counter and append the matching outcome) happen under a single lock
//! acquisition so a snapshot never observes them half-applied.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Whether a single download attempt succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

/// The recorded result of one download attempt. Immutable once created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOutcome {
    /// Basename the file was (or would have been) saved under.
    pub name: String,
    /// Bytes written to disk; zero on failure.
    pub size_bytes: u64,
    /// Success or failure marker.
    pub status: OutcomeStatus,
    /// Failure detail, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DownloadOutcome {
    /// Records a completed download of `size_bytes` bytes.
    #[must_use]
    pub fn success(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            status: OutcomeStatus::Success,
            error_message: None,
        }
    }

    /// Records a failed download attempt with its error message.
    #[must_use]
    pub fn failure(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: 0,
            status: OutcomeStatus::Failed,
            error_message: Some(message.into()),
        }
    }

    /// True when this outcome recorded a successful download.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Snapshot of one scraping run, serialized as-is by the `/status` endpoint.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    /// True while the background worker is processing the run.
    pub is_running: bool,
    /// The normalized URL being scraped.
    pub target_url: String,
    /// Resolved output directory for downloads.
    pub output_folder: String,
    /// Number of PDF links discovered on the page.
    pub found_count: usize,
    /// Downloads completed successfully so far.
    pub downloaded_count: usize,
    /// Downloads that failed so far.
    pub failed_count: usize,
    /// Per-link outcomes, in processing order.
    pub outcomes: Vec<DownloadOutcome>,
    /// Run-level errors and informational messages.
    pub errors: Vec<String>,
    /// True once the run reached its terminal state.
    pub is_complete: bool,
}

/// Shared handle around one run's status record.
///
/// Clones share the same record. Single writer, many snapshot readers.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle {
    inner: Arc<Mutex<RunStatus>>,
}

impl StatusHandle {
    /// Creates a handle with an idle, empty status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current status.
    #[must_use]
    pub fn snapshot(&self) -> RunStatus {
        self.lock().clone()
    }

    /// Atomically claims the handle for a new run.
    ///
    /// Returns false, leaving the active run untouched, when a run is already
    /// in progress. Otherwise resets the record to a fresh running state for
    /// `target_url`.
    #[must_use]
    pub fn try_begin(&self, target_url: &str) -> bool {
        let mut status = self.lock();
        if status.is_running {
            return false;
        }
        *status = RunStatus {
            is_running: true,
            target_url: target_url.to_string(),
            ..RunStatus::default()
        };
        true
    }

    /// Records the resolved output directory.
    pub fn set_output_folder(&self, folder: &str) {
        self.lock().output_folder = folder.to_string();
    }

    /// Records how many links were discovered.
    pub fn set_found(&self, count: usize) {
        self.lock().found_count = count;
    }

    /// Appends an outcome and bumps the matching counter in one step.
    pub fn record_outcome(&self, outcome: DownloadOutcome) {
        let mut status = self.lock();
        if outcome.is_success() {
            status.downloaded_count += 1;
        } else {
            status.failed_count += 1;
        }
        status.outcomes.push(outcome);
    }

    /// Appends a run-level error or informational message.
    pub fn record_error(&self, message: impl Into<String>) {
        self.lock().errors.push(message.into());
    }

    /// Marks the run complete and no longer running.
    pub fn finish(&self) {
        let mut status = self.lock();
        status.is_running = false;
        status.is_complete = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_is_idle() {
        let handle = StatusHandle::new();
        let status = handle.snapshot();
        assert!(!status.is_running);
        assert!(!status.is_complete);
        assert_eq!(status.found_count, 0);
    }

    #[test]
    fn test_try_begin_claims_and_resets() {
        let handle = StatusHandle::new();
        handle.record_error("leftover");

        assert!(handle.try_begin("https://x.org/"));
        let status = handle.snapshot();
        assert!(status.is_running);
        assert_eq!(status.target_url, "https://x.org/");
        assert!(status.errors.is_empty(), "begin must reset prior state");
    }

    #[test]
    fn test_try_begin_rejects_while_running() {
        let handle = StatusHandle::new();
        assert!(handle.try_begin("https://x.org/"));
        assert!(!handle.try_begin("https://other.org/"));

        // The active run's state is untouched
        assert_eq!(handle.snapshot().target_url, "https://x.org/");
    }

    #[test]
    fn test_try_begin_allowed_again_after_finish() {
        let handle = StatusHandle::new();
        assert!(handle.try_begin("https://x.org/"));
        handle.finish();
        assert!(handle.try_begin("https://y.org/"));
    }

    #[test]
    fn test_record_outcome_updates_matching_counter() {
        let handle = StatusHandle::new();
        assert!(handle.try_begin("https://x.org/"));
        handle.set_found(2);

        handle.record_outcome(DownloadOutcome::success("a.pdf", 100));
        handle.record_outcome(DownloadOutcome::failure("b.pdf", "HTTP 404"));
        handle.finish();

        let status = handle.snapshot();
        assert_eq!(status.downloaded_count, 1);
        assert_eq!(status.failed_count, 1);
        assert_eq!(status.outcomes.len(), 2);
        assert_eq!(
            status.found_count,
            status.downloaded_count + status.failed_count
        );
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let handle = StatusHandle::new();
        assert!(handle.try_begin("https://x.org/"));
        handle.record_outcome(DownloadOutcome::success("a.pdf", 7));
        handle.finish();

        let json = serde_json::to_value(handle.snapshot()).unwrap();
        assert_eq!(json["isRunning"], false);
        assert_eq!(json["isComplete"], true);
        assert_eq!(json["targetUrl"], "https://x.org/");
        assert_eq!(json["downloadedCount"], 1);
        assert_eq!(json["outcomes"][0]["name"], "a.pdf");
        assert_eq!(json["outcomes"][0]["sizeBytes"], 7);
        assert_eq!(json["outcomes"][0]["status"], "success");
    }

    #[test]
    fn test_failure_outcome_serializes_error_message() {
        let outcome = DownloadOutcome::failure("b.pdf", "timeout downloading b.pdf");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["errorMessage"], "timeout downloading b.pdf");
    }

    #[test]
    fn test_success_outcome_omits_error_message() {
        let json = serde_json::to_value(DownloadOutcome::success("a.pdf", 1)).unwrap();
        assert!(json.get("errorMessage").is_none());
    }
}
