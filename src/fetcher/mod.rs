//! HTTP fetcher implementation
//!
//! This module handles all plain HTTP requests made by the pipeline:
//! - Building the HTTP client with the configured user agent and timeout
//! - Single-attempt GET requests for the primary page, robots.txt and sitemap
//! - Error classification for logging
//!
//! A fetch never returns an error to its caller: every failure collapses to
//! "unavailable". There is no retry and no caching; callers that want
//! resilience must fetch again.

use crate::config::FetcherConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a single GET
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a 2xx status and a readable body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, DNS failure, timeout, unreadable body)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// The timeout covers the whole request including reading the body.
///
/// # Example
///
/// ```no_run
/// use site_lens::config::FetcherConfig;
/// use site_lens::fetcher::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET request and classifies the outcome
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: if e.is_timeout() {
                "Request timeout".to_string()
            } else {
                e.to_string()
            },
        },
    }
}

/// Timeout-bounded fetcher shared by every network step of an analysis
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL, returning its body or `None` when unavailable
    ///
    /// Any network error, timeout or non-2xx status yields `None`.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!(
                    "Fetched {} ({} bytes, status {}, final URL {})",
                    url,
                    body.len(),
                    status_code,
                    final_url
                );
                Some(body)
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Fetch of {} returned HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Fetch of {} failed: {}", url, error);
                None
            }
        }
    }
}
