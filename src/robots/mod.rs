//! Robots.txt handling module
//!
//! Fetches and parses the robots.txt of the analyzed site. The result feeds
//! the site signals of a report: presence, sitemap directives and whether the
//! analyzed page may be crawled.

mod parser;

pub use parser::ParsedRobots;

use crate::fetcher::Fetcher;
use url::Url;

/// Fetches robots.txt from the given location
///
/// Returns `None` when robots.txt is unavailable for any reason.
pub async fn fetch_robots(fetcher: &Fetcher, robots_url: &Url) -> Option<ParsedRobots> {
    let body = fetcher.fetch(robots_url.as_str()).await?;
    tracing::debug!("robots.txt found at {} ({} bytes)", robots_url, body.len());
    Some(ParsedRobots::from_content(&body))
}

/// Checks if a URL is allowed by robots.txt
///
/// A missing robots.txt allows everything.
pub fn is_allowed(robots: Option<&ParsedRobots>, url: &str, user_agent: &str) -> bool {
    robots.map_or(true, |robots| robots.is_allowed(url, user_agent))
}

/// Reduces a full user agent string to the token robots.txt groups match on
///
/// `"site-lens/0.1 (+https://example.com/bot)"` becomes `"site-lens"`.
pub fn product_token(user_agent: &str) -> String {
    user_agent
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '-' || *c == '_')
        .collect()
}
