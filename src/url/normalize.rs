use crate::UrlError;
use url::Url;

/// Scheme prefixed to targets given without one
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Normalizes a raw analysis target into an absolute URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `https://` when the input carries no `scheme://`
/// 3. Parse the URL; reject if malformed
/// 4. Accept only HTTP and HTTPS schemes
/// 5. Require a host
///
/// Nothing else is rewritten: path, query and fragment are kept as given,
/// since the page under analysis is the one the caller named.
///
/// # Examples
///
/// ```
/// use site_lens::url::normalize_target;
///
/// let url = normalize_target("example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_target(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Returns true when the input starts with `scheme://`
///
/// `Url::parse` alone is not enough here: `example.com:8080` parses with
/// `example.com` as its scheme.
fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(idx) if idx > 0 => input[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}

/// Returns the origin of a URL with a root path and no query or fragment
pub fn site_root(url: &Url) -> Url {
    let mut root = url.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_missing_scheme() {
        let url = normalize_target("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_prefix_missing_scheme_with_path() {
        let url = normalize_target("example.com/about?x=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about?x=1");
    }

    #[test]
    fn test_prefix_host_with_port() {
        let url = normalize_target("localhost:8080/page").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_keep_http_scheme() {
        let url = normalize_target("http://example.com/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_trim_whitespace() {
        let url = normalize_target("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_reject_empty() {
        assert!(matches!(normalize_target("   "), Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_reject_non_http_scheme() {
        let result = normalize_target("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_reject_malformed() {
        assert!(normalize_target("https://exa mple.com").is_err());
    }

    #[test]
    fn test_site_root() {
        let url = Url::parse("https://example.com/blog/post?id=3#top").unwrap();
        assert_eq!(site_root(&url).as_str(), "https://example.com/");
    }

    #[test]
    fn test_site_root_keeps_port() {
        let url = Url::parse("http://127.0.0.1:4000/a/b").unwrap();
        assert_eq!(site_root(&url).as_str(), "http://127.0.0.1:4000/");
    }
}
