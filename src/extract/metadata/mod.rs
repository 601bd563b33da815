//! Metadata extraction module
//!
//! Page metadata is resolved through a rule chain: every field owns an ordered
//! list of resolvers, and the first resolver returning a value wins. The
//! standard chain tries sources in this order:
//! 1. JSON-LD (schema.org structured data)
//! 2. `<meta>` tags (Open Graph, Twitter cards, named meta)
//! 3. DOM heuristics (title element, headings, bylines, images, `lang`)
//!
//! The chain is a plain value: build it once at startup and hand it to each
//! analysis, or build a different one in tests.

mod dom;
pub mod json_ld;
mod meta_tags;

use crate::analysis::Defaulted;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Semantic metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    Title,
    Description,
    Author,
    Image,
    Publisher,
    Language,
}

impl MetadataField {
    /// Returns all fields in report order
    pub fn all() -> [Self; 6] {
        [
            Self::Title,
            Self::Description,
            Self::Author,
            Self::Image,
            Self::Publisher,
            Self::Language,
        ]
    }

    /// Lowercase field name as it appears in the report
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Author => "author",
            Self::Image => "image",
            Self::Publisher => "publisher",
            Self::Language => "language",
        }
    }
}

/// Resolved metadata; unresolved fields are simply absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: BTreeMap<MetadataField, String>,
}

impl Metadata {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: MetadataField, value: String) {
        self.fields.insert(field, value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }
}

/// Everything a resolver may look at
pub struct PageContext<'a> {
    pub document: &'a Html,
    pub url: &'a Url,
    pub json_ld: Vec<Value>,
}

impl<'a> PageContext<'a> {
    pub fn new(document: &'a Html, url: &'a Url) -> Self {
        Self {
            document,
            url,
            json_ld: json_ld::json_ld_blocks(document),
        }
    }

    /// First non-empty trimmed text of an element matching `css`
    pub fn first_text(&self, css: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        self.document
            .select(&selector)
            .map(|element| crate::extract::collapse_whitespace(&element.text().collect::<String>()))
            .find(|text| !text.is_empty())
    }

    /// First non-empty trimmed attribute of an element matching `css`
    pub fn first_attr(&self, css: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        self.document
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// A single resolution strategy for one field
pub type Resolver = fn(&PageContext<'_>) -> Option<String>;

/// Ordered resolvers for one field
#[derive(Clone)]
pub struct FieldRule {
    pub field: MetadataField,
    pub resolvers: Vec<Resolver>,
}

/// The metadata rule chain
#[derive(Clone, Default)]
pub struct MetadataRules {
    rules: Vec<FieldRule>,
}

impl std::fmt::Debug for MetadataRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(
                self.rules
                    .iter()
                    .map(|rule| (rule.field.as_str(), rule.resolvers.len())),
            )
            .finish()
    }
}

impl MetadataRules {
    /// A chain with no rules; scraping yields empty metadata
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard chain: JSON-LD, then meta tags, then DOM heuristics
    pub fn standard() -> Self {
        Self::empty()
            .with_rule(
                MetadataField::Title,
                vec![json_ld_title as Resolver, meta_tags::title, dom::title],
            )
            .with_rule(
                MetadataField::Description,
                vec![json_ld_description as Resolver, meta_tags::description, dom::description],
            )
            .with_rule(
                MetadataField::Author,
                vec![json_ld_author as Resolver, meta_tags::author, dom::author],
            )
            .with_rule(
                MetadataField::Image,
                vec![json_ld_image as Resolver, meta_tags::image, dom::image],
            )
            .with_rule(
                MetadataField::Publisher,
                vec![json_ld_publisher as Resolver, meta_tags::publisher],
            )
            .with_rule(
                MetadataField::Language,
                vec![json_ld_language as Resolver, meta_tags::language, dom::language],
            )
    }

    /// Adds a rule; a later rule for the same field replaces the earlier one
    pub fn with_rule(mut self, field: MetadataField, resolvers: Vec<Resolver>) -> Self {
        self.rules.retain(|rule| rule.field != field);
        self.rules.push(FieldRule { field, resolvers });
        self
    }

    /// Resolves every configured field for a page
    ///
    /// Fields that no resolver can fill are left out. Fails only when there
    /// is no document to work on; callers substitute empty metadata then.
    pub fn scrape(&self, html: &str, url: &Url) -> Result<Metadata, Defaulted> {
        if html.trim().is_empty() {
            return Err(Defaulted::Scrape("empty document".to_string()));
        }

        let document = Html::parse_document(html);
        let context = PageContext::new(&document, url);
        let mut metadata = Metadata::default();

        for rule in &self.rules {
            let resolved = rule
                .resolvers
                .iter()
                .find_map(|resolver| resolver(&context))
                .and_then(|value| finalize(rule.field, value, url));

            if let Some(value) = resolved {
                metadata.insert(rule.field, value);
            }
        }

        Ok(metadata)
    }
}

/// Field-specific cleanup applied to the winning value
fn finalize(field: MetadataField, value: String, url: &Url) -> Option<String> {
    let value = crate::extract::collapse_whitespace(&value);
    if value.is_empty() {
        return None;
    }

    match field {
        MetadataField::Image => Some(
            url.join(&value)
                .map(|absolute| absolute.to_string())
                .unwrap_or(value),
        ),
        MetadataField::Language => normalize_language(&value),
        _ => Some(value),
    }
}

/// Reduces a locale such as `en_US` or `en-GB` to its lowercase primary subtag
fn normalize_language(value: &str) -> Option<String> {
    let primary = value.split(['-', '_']).next()?.trim().to_lowercase();
    if primary.len() >= 2 && primary.len() <= 3 && primary.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(primary)
    } else {
        None
    }
}

/// Types that describe the page content itself
const CONTENT_TYPES: &[&str] = &[
    "Article",
    "NewsArticle",
    "BlogPosting",
    "WebPage",
    "Product",
    "Report",
    "ScholarlyArticle",
    "TechArticle",
];

/// First node value for `key`, preferring content-describing nodes
fn json_ld_property(context: &PageContext<'_>, key: &str) -> Option<String> {
    let nodes = json_ld::json_ld_nodes(&context.json_ld);

    let preferred = nodes.iter().filter(|node| {
        json_ld::node_types(node)
            .iter()
            .any(|t| CONTENT_TYPES.contains(t))
    });

    preferred
        .chain(nodes.iter())
        .find_map(|node| node.get(key).and_then(json_ld::text_value))
}

fn json_ld_title(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "headline").or_else(|| json_ld_property(context, "name"))
}

fn json_ld_description(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "description")
}

fn json_ld_author(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "author").or_else(|| json_ld_property(context, "creator"))
}

fn json_ld_image(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "image").or_else(|| json_ld_property(context, "thumbnailUrl"))
}

fn json_ld_publisher(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "publisher").or_else(|| {
        json_ld::json_ld_nodes(&context.json_ld)
            .into_iter()
            .filter(|node| {
                json_ld::node_types(node)
                    .iter()
                    .any(|t| *t == "Organization" || *t == "WebSite")
            })
            .find_map(|node| node.get("name").and_then(json_ld::text_value))
    })
}

fn json_ld_language(context: &PageContext<'_>) -> Option<String> {
    json_ld_property(context, "inLanguage")
}
