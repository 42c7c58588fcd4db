//! Field extraction for a fetched page.
//!
//! Everything here is synchronous and infallible: a missing heading or
//! content region simply yields an empty string.

use crate::models::PageRecord;
use crate::utils::path_segments;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Characters removed from split tags: anything that is not an ASCII letter.
pub static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-zA-Z]").unwrap());

static TEXT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p, li").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body h1").unwrap());

/// Derive topic tags from URL path segments.
///
/// The second and third segments are taken verbatim. The fourth is split on
/// `_`, and each piece is lowercased with every `strip` match removed. Pieces
/// that end up empty are kept.
///
/// # Arguments
///
/// * `segments` - Path segments of the page URL, leading empty segment included
/// * `strip` - Characters to drop from each sub-tag, usually [`NON_ALPHA`]
///
/// ```ignore
/// let tags = extract_tags(&["", "a", "b", "C_D"], &NON_ALPHA);
/// assert_eq!(tags, ["a", "b", "c", "d"]);
/// ```
pub fn extract_tags<S: AsRef<str>>(segments: &[S], strip: &Regex) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(first) = segments.get(1) {
        tags.push(first.as_ref().to_string());
    }
    if let Some(second) = segments.get(2) {
        tags.push(second.as_ref().to_string());
    }
    if let Some(compound) = segments.get(3) {
        tags.extend(
            compound
                .as_ref()
                .split('_')
                .map(|piece| strip.replace_all(&piece.to_lowercase(), "").into_owned()),
        );
    }
    tags
}

/// Visible text of every `p` and `li` inside `region`, in document order.
///
/// Each element's text is followed by a newline; the joined result is trimmed.
pub fn clean_text(region: ElementRef<'_>) -> String {
    join_element_text(region.select(&TEXT_SELECTOR))
}

/// Visible `p` and `li` text across every element matching `content`.
///
/// Regions may nest (a broad selector such as `div` matches both an outer
/// container and the blocks inside it); each `p`/`li` is emitted once, in
/// document order. Text outside the content regions is ignored.
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `content` - Selector for the element(s) holding the article body
///
/// # Returns
///
/// The trimmed, newline-separated text, or `""` when nothing matches.
pub fn clean_document(document: &Html, content: &Selector) -> String {
    let elements = document
        .select(content)
        .flat_map(|region| region.select(&TEXT_SELECTOR))
        .unique_by(|element| element.id());
    join_element_text(elements)
}

fn join_element_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    let mut text = String::new();
    for element in elements {
        text.extend(element.text());
        text.push('\n');
    }
    text.trim().to_string()
}

/// Text of the first `h1` in the body, untrimmed. Empty when there is none.
pub fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|h1| h1.text().collect())
        .unwrap_or_default()
}

/// Parse `html` fetched from `url` and assemble its [`PageRecord`].
///
/// # Arguments
///
/// * `url` - The resolved page URL; its path supplies the tags
/// * `html` - The response body
/// * `content` - Selector for the article body region
pub fn build_record(url: &Url, html: &str, content: &Selector) -> PageRecord {
    let document = Html::parse_document(html);
    let title = extract_title(&document);
    let text = clean_document(&document, content);
    let tags = extract_tags(&path_segments(url), &NON_ALPHA);
    debug!(%url, %title, text_bytes = text.len(), ?tags, "Extracted page fields");
    PageRecord::new(url.to_string(), title, text, tags)
}
