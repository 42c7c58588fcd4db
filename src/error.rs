//! Error kinds for a harvest run.
//!
//! Failures fall into two groups that are handled very differently:
//!
//! - [`RunError`]: the run cannot continue (bad configuration, output that
//!   cannot be created, encoded or written). These abort the whole batch.
//! - [`PageError`]: a single page could not be fetched or named. The page is
//!   logged and skipped; the rest of the batch carries on.
//!
//! [`ScrapeError`] carries either kind out of the per-page pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("could not prepare {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("could not encode record for {url}: {source}")]
    Serialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("host not allowed: {url}")]
    DisallowedHost { url: String },
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url} has no path segment to name the raw file after")]
    ShortPath { url: String },
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fatal(#[from] RunError),
    #[error(transparent)]
    Skipped(#[from] PageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_and_skipped_are_distinct() {
        let fatal: ScrapeError = RunError::Write {
            path: PathBuf::from("output.jl"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        }
        .into();
        assert!(matches!(fatal, ScrapeError::Fatal(RunError::Write { .. })));

        let skipped: ScrapeError = PageError::DisallowedHost {
            url: "https://example.org/wiki/Robot".to_string(),
        }
        .into();
        assert!(matches!(skipped, ScrapeError::Skipped(PageError::DisallowedHost { .. })));
    }

    #[test]
    fn test_error_messages() {
        let err = PageError::ShortPath {
            url: "https://en.wikipedia.org/wiki".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "https://en.wikipedia.org/wiki has no path segment to name the raw file after"
        );

        let err: ScrapeError = RunError::Config("concurrency must be at least 1".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: concurrency must be at least 1"
        );
    }
}
