//! Background run ownership for the polling dashboard.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::status::{RunStatus, StatusHandle};
use super::{Scraper, normalize_target_url};

/// Why a run could not be started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    /// A run is already in progress; it keeps running untouched.
    #[error("Already running")]
    AlreadyRunning,
}

/// Owns the single background run and its status record.
///
/// Only one run may be active at a time; the claim happens atomically inside
/// the status mutex, so concurrent `start` calls cannot both win. A started
/// run always completes — there is no cancellation.
#[derive(Debug, Clone)]
pub struct RunController {
    scraper: Arc<Scraper>,
    status: StatusHandle,
}

impl Default for RunController {
    fn default() -> Self {
        Self::new(Scraper::new())
    }
}

impl RunController {
    /// Creates a controller around the given scraper.
    #[must_use]
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper: Arc::new(scraper),
            status: StatusHandle::new(),
        }
    }

    /// Returns a snapshot of the current (or last) run's status.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status.snapshot()
    }

    /// Spawns a run in the background and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::AlreadyRunning`] while a run is active; the
    /// active run's state is left untouched.
    pub fn start(&self, target: &str, folder: Option<String>) -> Result<(), StartError> {
        let url = normalize_target_url(target);
        if !self.status.try_begin(&url) {
            return Err(StartError::AlreadyRunning);
        }

        info!(url = %url, "run started");
        let scraper = Arc::clone(&self.scraper);
        let status = self.status.clone();
        tokio::spawn(async move {
            scraper.execute(&url, folder.as_deref(), &status).await;
        });

        Ok(())
    }
}
