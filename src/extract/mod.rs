//! Static extraction over fetched HTML
//!
//! Everything in this module works on the raw parsed document without
//! executing scripts:
//! - Structural/textual metrics (title, headings, counts, structured data)
//! - Page metadata through a layered rule chain
//! - Keyword ranking over the visible body text
//! - Social profile links

mod html;
mod keywords;
pub mod metadata;
mod social;

pub use html::{count_words, extract_html_metrics, metrics_from_document, HtmlMetrics, TITLE_PLACEHOLDER};
pub use keywords::{extract_keywords, KeywordExtractor, DEFAULT_KEYWORD_LIMIT};
pub use metadata::{Metadata, MetadataField, MetadataRules};
pub use social::{extract_social_links, SocialLink};

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never reaches the reader
const NON_VISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Returns the text content of `<body>`, skipping script-like elements
///
/// Text nodes are concatenated as they appear. Block-level elements are
/// padded with spaces so `<li>Home</li><li>Pricing</li>` reads as two words,
/// while inline markup such as `wid<b>get</b>` stays joined. Callers collapse
/// the resulting whitespace.
pub fn body_text(document: &Html) -> String {
    let mut text = String::new();
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            collect_text(body, &mut text);
        }
    }
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if !NON_VISIBLE_ELEMENTS.contains(&el.name()) => {
                let block = BLOCK_ELEMENTS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
