//! Site-level signals: robots.txt presence, sitemap location, crawl permission

use crate::fetcher::Fetcher;
use crate::robots::{self, ParsedRobots};
use crate::url::AnalysisRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSignals {
    pub robots_txt_present: bool,
    pub sitemap_url: Option<String>,
    pub crawl_allowed: bool,
}

impl Default for SiteSignals {
    fn default() -> Self {
        Self {
            robots_txt_present: false,
            sitemap_url: None,
            crawl_allowed: true,
        }
    }
}

/// Resolves the site signals for a request
///
/// The sitemap comes from the first `Sitemap:` directive in robots.txt; only
/// when there is none is `/sitemap.xml` probed at the site root.
pub async fn resolve_site_signals(
    fetcher: &Fetcher,
    request: &AnalysisRequest,
    user_agent: &str,
) -> SiteSignals {
    let robots_url = request.robots_url();
    let robots = robots::fetch_robots(fetcher, &robots_url).await;

    let sitemap_url = match robots.as_ref().and_then(|r| sitemap_directive(r, request)) {
        Some(url) => {
            tracing::debug!("Sitemap from robots.txt: {}", url);
            Some(url)
        }
        None => probe_sitemap(fetcher, request).await,
    };

    let crawl_allowed = robots::is_allowed(
        robots.as_ref(),
        request.target_url().as_str(),
        &robots::product_token(user_agent),
    );

    SiteSignals {
        robots_txt_present: robots.is_some(),
        sitemap_url,
        crawl_allowed,
    }
}

/// First sitemap directive, resolved against robots.txt's location
fn sitemap_directive(robots: &ParsedRobots, request: &AnalysisRequest) -> Option<String> {
    let value = robots.sitemaps().into_iter().next()?;
    let resolved = request
        .robots_url()
        .join(&value)
        .map(|url| url.to_string())
        .unwrap_or(value);
    Some(resolved)
}

async fn probe_sitemap(fetcher: &Fetcher, request: &AnalysisRequest) -> Option<String> {
    let sitemap_url = request.default_sitemap_url();
    fetcher.fetch(sitemap_url.as_str()).await?;
    tracing::debug!("Sitemap found at {}", sitemap_url);
    Some(sitemap_url.to_string())
}
