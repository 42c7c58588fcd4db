//! Page fetching and field extraction.
//!
//! Scraping follows a two-stage pattern:
//!
//! 1. **Fetching** ([`wiki`]): request each configured URL from an allowed
//!    host, keep the raw body, and hand it on.
//! 2. **Extracting** ([`extract`]): parse the HTML and derive the title,
//!    cleaned body text, and URL-based tags of a [`PageRecord`].
//!
//! | Field | Source |
//! |-------|--------|
//! | `url` | final response URL |
//! | `title` | first `h1` in `body` |
//! | `text` | `p` and `li` text inside the content region |
//! | `tags` | URL path segments |
//!
//! Fetch failures are logged and skipped without failing the batch.
//!
//! [`PageRecord`]: crate::models::PageRecord

pub mod extract;
pub mod wiki;
