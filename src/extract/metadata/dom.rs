//! DOM heuristics, used when neither structured data nor meta tags resolve a field

use super::PageContext;

/// Minimum length for a paragraph to serve as a description
const MIN_DESCRIPTION_CHARS: usize = 40;

const AUTHOR_SELECTORS: &[&str] = &[
    "[rel='author']",
    "[itemprop='author']",
    ".author",
    ".byline",
    ".post-author",
];

pub(super) fn title(context: &PageContext<'_>) -> Option<String> {
    context
        .first_text("title")
        .or_else(|| context.first_text("h1"))
}

pub(super) fn description(context: &PageContext<'_>) -> Option<String> {
    let selector = scraper::Selector::parse("p").ok()?;

    context
        .document
        .select(&selector)
        .map(|p| crate::extract::collapse_whitespace(&p.text().collect::<String>()))
        .find(|text| text.chars().count() >= MIN_DESCRIPTION_CHARS)
}

pub(super) fn author(context: &PageContext<'_>) -> Option<String> {
    AUTHOR_SELECTORS
        .iter()
        .find_map(|css| context.first_text(css))
        .map(|text| strip_byline_prefix(&text))
        .filter(|text| !text.is_empty())
}

pub(super) fn image(context: &PageContext<'_>) -> Option<String> {
    context
        .first_attr("link[rel='image_src'][href]", "href")
        .or_else(|| context.first_attr("img[src]", "src"))
        .filter(|src| !src.starts_with("data:"))
}

pub(super) fn language(context: &PageContext<'_>) -> Option<String> {
    context.first_attr("html[lang]", "lang")
}

/// Removes a leading "By" from byline text
fn strip_byline_prefix(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => trimmed[3..].trim().to_string(),
        _ => trimmed.to_string(),
    }
}
