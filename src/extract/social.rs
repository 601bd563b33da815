//! Social profile link detection

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Host suffix to network name
const NETWORKS: &[(&str, &str)] = &[
    ("facebook.com", "facebook"),
    ("fb.com", "facebook"),
    ("twitter.com", "twitter"),
    ("x.com", "twitter"),
    ("instagram.com", "instagram"),
    ("linkedin.com", "linkedin"),
    ("youtube.com", "youtube"),
    ("youtu.be", "youtube"),
    ("tiktok.com", "tiktok"),
    ("github.com", "github"),
    ("pinterest.com", "pinterest"),
];

/// A link to a profile on a known social network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: String,
    pub url: String,
}

/// Collects social network links from `<a href>` elements
///
/// Hrefs are resolved against `base`. Each absolute URL appears once, in
/// document order.
pub fn extract_social_links(document: &Html, base: &Url) -> Vec<SocialLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links: Vec<SocialLink> = Vec::new();
    for href in document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
    {
        let Ok(url) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        let Some(network) = url.host_str().and_then(network_for_host) else {
            continue;
        };

        let url = url.to_string();
        if links.iter().any(|link| link.url == url) {
            continue;
        }
        links.push(SocialLink {
            network: network.to_string(),
            url,
        });
    }
    links
}

fn network_for_host(host: &str) -> Option<&'static str> {
    let host = host.to_ascii_lowercase();
    NETWORKS
        .iter()
        .find(|(domain, _)| {
            host == *domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
        .map(|(_, network)| *network)
}
