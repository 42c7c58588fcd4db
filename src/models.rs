//! Data model for harvested pages.
//!
//! A [`PageRecord`] is the structured output unit: one per successfully
//! fetched page, written exactly once as a single JSON line.

use serde::{Deserialize, Serialize};

/// The structured output for one fetched page.
///
/// Field names are part of the output format: every line of the JSON Lines
/// file is a serialized `PageRecord` with `url`, `title`, `text` and `tags`.
/// Records are immutable once built; empty titles or text are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRecord {
    url: String,
    title: String,
    text: String,
    tags: Vec<String>,
}

impl PageRecord {
    /// Assemble a record from already-extracted parts.
    pub fn new(url: String, title: String, text: String, tags: Vec<String>) -> Self {
        Self {
            url,
            title,
            text,
            tags,
        }
    }

    /// The resolved absolute URL of the page.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first top-level heading.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Cleaned body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Topic tags derived from the URL path, in path order.
    ///
    /// Holds the section and article segments verbatim, followed by the
    /// lowercased letters of each `_`-separated piece of any deeper segment.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Pages that produced a record line.
    pub recorded: usize,
    /// Pages whose raw body was saved but which were not HTML, so no record
    /// line was written.
    pub archived: usize,
    /// Pages skipped after a non-fatal failure.
    pub failed: usize,
}

impl BatchSummary {
    /// Every page that reached a final state.
    pub fn total(&self) -> usize {
        self.recorded + self.archived + self.failed
    }
}
