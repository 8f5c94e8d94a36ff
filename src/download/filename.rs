//! Filename derivation and collision-free path resolution for downloads.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Fallback filename when a URL has no usable final path segment.
const FALLBACK_FILENAME: &str = "document.pdf";

/// Upper bound on the duplicate-suffix search before falling back to a
/// timestamp suffix. Keeps the loop finite if a directory accumulates
/// thousands of stale copies.
const MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Derives a local filename from a download URL.
///
/// Takes the last path segment (percent-decoded and sanitized); an empty
/// segment falls back to `document.pdf`, and a name that does not already end
/// in `.pdf` case-insensitively gets the extension appended.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let segment = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(std::string::ToString::to_string))
    });

    let mut filename = segment
        .as_deref()
        .map(|last| {
            let decoded = urlencoding::decode(last)
                .map(std::borrow::Cow::into_owned)
                .unwrap_or_else(|_| last.to_string());
            sanitize_filename(&decoded)
        })
        .filter(|name| !name.trim_matches('_').is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        filename.push_str(".pdf");
    }

    filename
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Resolves a unique file path, adding a numeric suffix if the file exists.
///
/// `report.pdf` taken means `report_1.pdf`, then `report_2.pdf`, and so on.
/// The resolved path never points at an existing file, and always stays under
/// `dir` (candidate names with path separators or dot segments are replaced
/// with the fallback name).
#[must_use]
pub fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = {
        let sanitized = sanitize_filename(filename);
        // Ensure no path separators remain (defense in depth against path traversal)
        if sanitized.contains('/')
            || sanitized.contains('\\')
            || sanitized.trim_matches('_').is_empty()
        {
            FALLBACK_FILENAME.to_string()
        } else {
            sanitized
        }
    };
    let base_path = dir.join(&filename);

    if !base_path.exists() {
        return base_path;
    }

    // Split filename into stem and extension
    let (stem, ext) = match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos..]),
        None => (filename.as_str(), ""),
    };

    // Try with numeric suffixes
    for i in 1..MAX_SUFFIX_ATTEMPTS {
        let new_name = format!("{stem}_{i}{ext}");
        let new_path = dir.join(new_name);
        if !new_path.exists() {
            return new_path;
        }
    }

    // Fallback (extremely unlikely)
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("{stem}_{timestamp}{ext}"))
}
