//! Resolvers backed by `<meta>` tags
//!
//! Open Graph and Twitter card tags are checked before plain named meta tags.
//! Keys match against `property`, `name` or `itemprop`, case-insensitively.

use super::PageContext;
use scraper::Selector;

/// Content of the first meta tag whose key matches one of `keys`, in key order
fn meta_value(context: &PageContext<'_>, keys: &[&str]) -> Option<String> {
    let selector = Selector::parse("meta[content]").ok()?;

    keys.iter().find_map(|key| {
        context
            .document
            .select(&selector)
            .filter(|element| {
                ["property", "name", "itemprop"].iter().any(|attr| {
                    element
                        .value()
                        .attr(attr)
                        .is_some_and(|value| value.trim().eq_ignore_ascii_case(key))
                })
            })
            .filter_map(|element| element.value().attr("content"))
            .map(|content| content.trim().to_string())
            .find(|content| !content.is_empty())
    })
}

pub(super) fn title(context: &PageContext<'_>) -> Option<String> {
    meta_value(context, &["og:title", "twitter:title", "title"])
}

pub(super) fn description(context: &PageContext<'_>) -> Option<String> {
    meta_value(
        context,
        &["og:description", "twitter:description", "description"],
    )
}

pub(super) fn author(context: &PageContext<'_>) -> Option<String> {
    meta_value(
        context,
        &["author", "article:author", "twitter:creator", "dc.creator"],
    )
    // article:author is often a profile URL rather than a name
    .filter(|value| !value.starts_with("http://") && !value.starts_with("https://"))
}

pub(super) fn image(context: &PageContext<'_>) -> Option<String> {
    meta_value(
        context,
        &[
            "og:image:secure_url",
            "og:image",
            "og:image:url",
            "twitter:image",
            "twitter:image:src",
            "image",
        ],
    )
}

pub(super) fn publisher(context: &PageContext<'_>) -> Option<String> {
    meta_value(
        context,
        &["og:site_name", "application-name", "publisher", "dc.publisher"],
    )
}

pub(super) fn language(context: &PageContext<'_>) -> Option<String> {
    meta_value(context, &["og:locale", "language", "content-language"]).or_else(|| {
        context.first_attr("meta[http-equiv='content-language'][content]", "content")
    })
}
