//! Raw HTML snapshots.
//!
//! Each fetched page body is stored byte-for-byte as `<segment>.html`, where
//! `<segment>` is the third slash-separated piece of the URL path (the article
//! name for `/wiki/<Article>` URLs). Existing files are overwritten.

use crate::error::{PageError, RunError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Filename for a page's raw snapshot, from its URL path segments.
///
/// Returns `None` when the path has no non-empty third segment, e.g. `/wiki`
/// or `/wiki/`.
pub fn raw_filename<S: AsRef<str>>(segments: &[S]) -> Option<String> {
    let segment: &str = segments.get(2)?.as_ref();
    if segment.is_empty() {
        return None;
    }
    Some(format!("{segment}.html"))
}

/// [`raw_filename`], turning a missing segment into a page error for `url`.
pub fn require_raw_filename<S: AsRef<str>>(url: &str, segments: &[S]) -> Result<String, PageError> {
    raw_filename(segments).ok_or_else(|| PageError::ShortPath {
        url: url.to_string(),
    })
}

/// Write `content` unchanged to `dir/filename`, creating `dir` if absent.
///
/// # Arguments
///
/// * `dir` - The page directory
/// * `filename` - File name from [`raw_filename`]
/// * `content` - The response body, written byte for byte
///
/// # Returns
///
/// The path written. An existing file of the same name is overwritten.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %filename))]
pub async fn save_raw_page(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, RunError> {
    fs::create_dir_all(dir).await.map_err(|source| RunError::Setup {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(filename);
    fs::write(&path, content).await.map_err(|source| RunError::Write {
        path: path.clone(),
        source,
    })?;
    info!(bytes = content.len(), "Saved raw page");
    Ok(path)
}
