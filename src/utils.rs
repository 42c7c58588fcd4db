//! Helpers shared by the pipeline stages.
//!
//! - URL path splitting for tag extraction and raw file naming
//! - String truncation for log previews
//! - Output directory validation

use crate::error::RunError;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Split a URL's percent-decoded path on `/`.
///
/// The leading slash produces an empty first segment, so
/// `https://en.wikipedia.org/wiki/Robot` yields `["", "wiki", "Robot"]`.
/// Paths that do not decode to UTF-8 are split undecoded.
///
/// # Examples
///
/// ```ignore
/// let url = Url::parse("https://en.wikipedia.org/wiki/Android_(robot)").unwrap();
/// assert_eq!(path_segments(&url), vec!["", "wiki", "Android_(robot)"]);
/// ```
pub fn path_segments(url: &Url) -> Vec<String> {
    let path = url.path();
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    decoded.split('/').map(str::to_string).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
/// Either failure is a setup error and aborts the run before any fetch.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), RunError> {
    let setup_err = |source| RunError::Setup {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(path).await.map_err(setup_err)?;

    let check_path = path.join("..__write_check__");
    stdfs::File::create(&check_path).map_err(setup_err)?;
    let _ = stdfs::remove_file(&check_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        let url = Url::parse("https://en.wikipedia.org/wiki/Robot").unwrap();
        assert_eq!(path_segments(&url), vec!["", "wiki", "Robot"]);

        let url = Url::parse("https://en.wikipedia.org/").unwrap();
        assert_eq!(path_segments(&url), vec!["", ""]);
    }

    #[test]
    fn test_path_segments_decodes() {
        let url = Url::parse("https://en.wikipedia.org/wiki/Caf%C3%A9_racer").unwrap();
        assert_eq!(path_segments(&url), vec!["", "wiki", "Café_racer"]);

        let url = Url::parse("https://en.wikipedia.org/wiki/Android_(robot)").unwrap();
        assert_eq!(path_segments(&url), vec!["", "wiki", "Android_(robot)"]);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        // "é" is two bytes; cutting at 1 must back off to 0.
        assert_eq!(truncate_for_log("éa", 1), "…(+3 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__write_check__").exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_over_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_writable_dir(&file).await.unwrap_err();
        assert!(matches!(err, RunError::Setup { .. }));
    }
}
