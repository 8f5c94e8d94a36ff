//! HTTP download executor: streaming files to disk with collision-safe names.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Filename derivation from the URL path, with `.pdf` normalization
//! - Duplicate filename handling (adds numeric suffix, never overwrites)
//! - Partial-file cleanup when a transfer fails mid-stream
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use pdfscrape::download::{HttpClient, filename_from_url, resolve_unique_path};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = "https://example.com/paper.pdf";
//! let destination = resolve_unique_path(Path::new("./downloads"), &filename_from_url(url));
//! let bytes = client.download_to_path(url, &destination).await?;
//! println!("Saved {} ({bytes} bytes)", destination.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;

pub use client::HttpClient;
pub use constants::{DOWNLOAD_TIMEOUT_SECS, WRITE_BUFFER_BYTES};
pub use error::DownloadError;
pub use filename::{filename_from_url, resolve_unique_path};
