//! Structural and textual metrics of a static HTML document
//!
//! Extraction is a pure function of the input string: parsing the same HTML
//! twice yields identical metrics.

use crate::extract::metadata::json_ld;
use crate::extract::{body_text, collapse_whitespace};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Title reported when the document has no usable `<title>`
pub const TITLE_PLACEHOLDER: &str = "No title";

/// Metrics derived by counting and selecting over the parsed DOM
///
/// `description` and `first_h1` are `None` when the element is absent and
/// `Some("")` when it is present but empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlMetrics {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "firstH1")]
    pub first_h1: Option<String>,
    #[serde(rename = "h1Count")]
    pub h1_count: usize,
    #[serde(rename = "h2Count")]
    pub h2_count: usize,
    pub word_count: usize,
    pub link_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub lang: Option<String>,
    pub canonical: Option<String>,
    pub viewport_present: bool,
    pub structured_data_count: usize,
    pub structured_data_types: Vec<String>,
}

/// Parses HTML and extracts its metrics
///
/// # Example
///
/// ```
/// use site_lens::extract::extract_html_metrics;
///
/// let metrics = extract_html_metrics("<html><body><h1>Hi</h1><p>two words</p></body></html>");
/// assert_eq!(metrics.title, "No title");
/// assert_eq!(metrics.first_h1.as_deref(), Some("Hi"));
/// assert_eq!(metrics.word_count, 3);
/// ```
pub fn extract_html_metrics(html: &str) -> HtmlMetrics {
    let document = Html::parse_document(html);
    metrics_from_document(&document)
}

/// Extracts metrics from an already parsed document
pub fn metrics_from_document(document: &Html) -> HtmlMetrics {
    let blocks = json_ld::json_ld_blocks(document);

    HtmlMetrics {
        title: extract_title(document).unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        description: meta_content(document, "description"),
        first_h1: first_text(document, "h1"),
        h1_count: count(document, "h1"),
        h2_count: count(document, "h2"),
        word_count: count_words(&body_text(document)),
        link_count: count(document, "a[href]"),
        image_count: count(document, "img"),
        images_missing_alt: count(document, "img:not([alt])"),
        lang: attr_of_first(document, "html", "lang")
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty()),
        canonical: attr_of_first(document, "link[rel='canonical'][href]", "href")
            .map(|href| href.trim().to_string()),
        viewport_present: meta_content(document, "viewport").is_some(),
        structured_data_count: blocks.len(),
        structured_data_types: json_ld::schema_types(&blocks),
    }
}

/// Counts whitespace-delimited non-empty tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Extracts the trimmed `<title>` text, `None` when absent or empty
fn extract_title(document: &Html) -> Option<String> {
    first_text(document, "title").filter(|s| !s.is_empty())
}

/// Returns the `content` of the first `<meta name=...>` matching `name`
///
/// Names are compared case-insensitively. A matching tag without `content`
/// counts as present but empty.
pub(crate) fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .map(|element| element.value().attr("content").unwrap_or("").trim().to_string())
}

/// Collapsed text of the first element matching `css`
fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
}

fn attr_of_first(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(String::from)
}

fn count(document: &Html, css: &str) -> usize {
    Selector::parse(css)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}
