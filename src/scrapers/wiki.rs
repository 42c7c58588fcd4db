//! Batch fetch driver.
//!
//! [`Harvester`] takes a [`HarvestConfig`], prepares the output artifacts, and
//! runs every configured page through the pipeline:
//!
//! ```text
//! queued → fetching → response received → raw saved → parsed → recorded
//!                  ↘ failed (logged, skipped)   ↘ archived (not HTML)
//! ```
//!
//! Only bodies served as HTML (or XML/XHTML) are parsed into records; any
//! other content type keeps its raw file and writes no line.
//!
//! Up to `concurrency` requests are in flight at once. Pages finish in any
//! order. A [`PageError`] skips that page only; a [`RunError`] stops the
//! batch and is returned from [`Harvester::run`].

use crate::config::HarvestConfig;
use crate::error::{PageError, RunError, ScrapeError};
use crate::models::{BatchSummary, PageRecord};
use crate::outputs::jsonl::RecordSink;
use crate::outputs::raw::{require_raw_filename, save_raw_page};
use crate::scrapers::extract::build_record;
use crate::utils::{ensure_writable_dir, path_segments, truncate_for_log};
use futures::stream::{self, StreamExt};
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Url, redirect};
use scraper::Selector;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const MAX_REDIRECTS: usize = 10;

/// Fetches the configured pages and writes their outputs.
#[derive(Debug)]
pub struct Harvester {
    config: HarvestConfig,
    content: Selector,
    client: Client,
    sink: Arc<RecordSink>,
}

impl Harvester {
    /// Validate `config` and create the page directory and output file.
    ///
    /// Any failure here happens before a single request is sent.
    #[instrument(level = "info", skip_all)]
    pub async fn new(config: HarvestConfig) -> Result<Self, RunError> {
        let content = config.validate()?;
        ensure_writable_dir(&config.page_dir).await?;
        let sink = Arc::new(RecordSink::create(&config.output_file).await?);
        let client = build_client(&config)?;
        info!(
            pages = config.pages.len(),
            allowed_hosts = ?config.allowed_hosts,
            concurrency = config.concurrency,
            "Harvester ready"
        );
        Ok(Self {
            config,
            content,
            client,
            sink,
        })
    }

    /// Run the whole batch and wait for every page to be recorded or skipped.
    ///
    /// # Returns
    ///
    /// Per-outcome page counts once every page has finished and the output
    /// file is synced.
    ///
    /// # Errors
    ///
    /// The first [`RunError`] raised by any page. Pages still in flight are
    /// dropped and whatever was already written stays on disk.
    #[instrument(level = "info", skip_all, fields(pages = self.config.pages.len()))]
    pub async fn run(&self) -> Result<BatchSummary, RunError> {
        let mut summary = BatchSummary::default();
        let mut outcomes = stream::iter(self.config.pages.iter())
            .map(|url| async move { (url, self.harvest_page(url).await) })
            .buffer_unordered(self.config.concurrency);

        while let Some((url, outcome)) = outcomes.next().await {
            match outcome {
                Ok(None) => {
                    summary.archived += 1;
                    debug!(%url, "Saved raw body only, not HTML");
                }
                Ok(Some(record)) => {
                    summary.recorded += 1;
                    debug!(
                        %url,
                        title = %record.title(),
                        tags = ?record.tags(),
                        text = %truncate_for_log(record.text(), 120),
                        "Recorded page"
                    );
                }
                Err(ScrapeError::Skipped(e)) => {
                    summary.failed += 1;
                    warn!(%url, error = %e, "Skipping page");
                }
                Err(ScrapeError::Fatal(e)) => {
                    error!(%url, error = %e, "Aborting run");
                    return Err(e);
                }
            }
        }

        self.sink.finish().await?;
        info!(
            total = summary.total(),
            recorded = summary.recorded,
            archived = summary.archived,
            failed = summary.failed,
            output = %self.sink.path().display(),
            "Batch complete"
        );
        Ok(summary)
    }

    /// Fetch one page and push it through save, extract and append.
    ///
    /// Returns `None` when the body was archived but is not HTML.
    #[instrument(level = "debug", skip(self))]
    async fn harvest_page(&self, url: &str) -> Result<Option<PageRecord>, ScrapeError> {
        let target = self.check_url(url)?;
        info!(url = %target, "Visiting");

        let fetch_err = |source| PageError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status {
                url: url.to_string(),
                status,
            }
            .into());
        }

        let resolved = response.url().clone();
        let is_html = is_html_response(response.headers());
        let body = response.bytes().await.map_err(fetch_err)?;
        debug!(url = %resolved, bytes = body.len(), "Response received");

        let segments = path_segments(&resolved);
        let filename = require_raw_filename(resolved.as_str(), &segments)?;
        save_raw_page(&self.config.page_dir, &filename, &body).await?;
        if !is_html {
            return Ok(None);
        }

        let html = String::from_utf8_lossy(&body);
        let record = build_record(&resolved, &html, &self.content);
        self.sink.append(&record).await?;
        Ok(Some(record))
    }

    /// Parse `url` and reject it unless its host is allowed.
    fn check_url(&self, url: &str) -> Result<Url, PageError> {
        let parsed = Url::parse(url).map_err(|source| PageError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let allowed = parsed
            .host_str()
            .is_some_and(|host| self.config.is_allowed_host(host));
        if !allowed {
            return Err(PageError::DisallowedHost {
                url: url.to_string(),
            });
        }
        Ok(parsed)
    }
}

/// Whether a response body should be parsed as a page.
///
/// A missing `Content-Type` is treated as HTML.
fn is_html_response(headers: &HeaderMap) -> bool {
    match headers.get(CONTENT_TYPE) {
        None => true,
        Some(value) => {
            let content_type = String::from_utf8_lossy(value.as_bytes()).to_ascii_lowercase();
            content_type.contains("html") || content_type.contains("xml")
        }
    }
}

/// HTTP client that refuses redirects leaving the allowed hosts.
fn build_client(config: &HarvestConfig) -> Result<Client, RunError> {
    let allowed = config.allowed_hosts.clone();
    let policy = redirect::Policy::custom(move |attempt| {
        let host_allowed = attempt
            .url()
            .host_str()
            .is_some_and(|host| allowed.iter().any(|a| a.eq_ignore_ascii_case(host)));
        if !host_allowed {
            let reason = format!("redirect to disallowed host: {}", attempt.url());
            attempt.error(reason)
        } else if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    });

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(policy);
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(RunError::Client)
}
