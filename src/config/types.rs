use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Site-Lens
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Timeout for each single GET (seconds)
    #[serde(rename = "timeout-secs", default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request and matched against robots.txt
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Headless rendering and accessibility configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Whether the rendering branch (accessibility + colors) runs at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Upper bound for page navigation (seconds)
    #[serde(
        rename = "navigation-timeout-secs",
        default = "default_navigation_timeout"
    )]
    pub navigation_timeout_secs: u64,

    /// Explicit browser binary; otherwise environment and PATH are searched
    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<PathBuf>,

    /// Local copy of axe.min.js; takes precedence over the CDN
    #[serde(rename = "axe-script-path", default)]
    pub axe_script_path: Option<PathBuf>,

    /// CDN location of axe-core used when no local script is configured
    #[serde(rename = "axe-cdn-url", default = "default_axe_cdn_url")]
    pub axe_cdn_url: String,
}

/// Page-speed audit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Upper bound for a whole lighthouse run (seconds)
    #[serde(rename = "timeout-secs", default = "default_performance_timeout")]
    pub timeout_secs: u64,

    /// Lighthouse CLI executable
    #[serde(rename = "lighthouse-command", default = "default_lighthouse_command")]
    pub lighthouse_command: String,
}

/// Keyword extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// Maximum number of keywords in the report
    #[serde(default = "default_keyword_limit")]
    pub limit: usize,

    /// Additional words excluded from ranking
    #[serde(rename = "extra-stopwords", default)]
    pub extra_stopwords: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("site-lens/{}", env!("CARGO_PKG_VERSION"))
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_axe_cdn_url() -> String {
    "https://cdnjs.cloudflare.com/ajax/libs/axe-core/4.10.2/axe.min.js".to_string()
}

fn default_performance_timeout() -> u64 {
    90
}

fn default_lighthouse_command() -> String {
    "lighthouse".to_string()
}

fn default_keyword_limit() -> usize {
    15
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            navigation_timeout_secs: default_navigation_timeout(),
            chrome_executable: None,
            axe_script_path: None,
            axe_cdn_url: default_axe_cdn_url(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_performance_timeout(),
            lighthouse_command: default_lighthouse_command(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            limit: default_keyword_limit(),
            extra_stopwords: Vec::new(),
        }
    }
}
