//! URL handling module for Site-Lens
//!
//! Target normalization and the immutable analysis request built from it.

mod normalize;

use crate::UrlError;
use url::Url;

pub use normalize::{normalize_target, site_root};

/// A normalized analysis target
///
/// Constructed once from the raw user input; the URL cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    target_url: Url,
}

impl AnalysisRequest {
    /// Normalizes the raw target and wraps it
    ///
    /// # Examples
    ///
    /// ```
    /// use site_lens::url::AnalysisRequest;
    ///
    /// let request = AnalysisRequest::new("example.com").unwrap();
    /// assert_eq!(request.target_url().as_str(), "https://example.com/");
    /// ```
    pub fn new(raw: &str) -> Result<Self, UrlError> {
        Ok(Self {
            target_url: normalize_target(raw)?,
        })
    }

    /// The normalized target URL
    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Location of robots.txt for the target's origin
    pub fn robots_url(&self) -> Url {
        let mut url = site_root(&self.target_url);
        url.set_path("/robots.txt");
        url
    }

    /// Conventional sitemap location for the target's origin
    pub fn default_sitemap_url(&self) -> Url {
        let mut url = site_root(&self.target_url);
        url.set_path("/sitemap.xml");
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_normalizes() {
        let request = AnalysisRequest::new("example.com/shop").unwrap();
        assert_eq!(request.target_url().as_str(), "https://example.com/shop");
    }

    #[test]
    fn test_robots_url() {
        let request = AnalysisRequest::new("https://example.com/a/b?c=d").unwrap();
        assert_eq!(
            request.robots_url().as_str(),
            "https://example.com/robots.txt"
        );
    }

    #[test]
    fn test_default_sitemap_url() {
        let request = AnalysisRequest::new("http://127.0.0.1:9000/x").unwrap();
        assert_eq!(
            request.default_sitemap_url().as_str(),
            "http://127.0.0.1:9000/sitemap.xml"
        );
    }

    #[test]
    fn test_request_rejects_bad_scheme() {
        assert!(AnalysisRequest::new("javascript://alert(1)").is_err());
    }
}
