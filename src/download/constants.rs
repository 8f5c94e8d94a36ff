//! Constants for the download module.

/// Default total timeout for one file download (60 seconds).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Write buffer size for streaming a response body to disk (8 KiB).
pub const WRITE_BUFFER_BYTES: usize = 8192;
