//! Site-Lens: a multi-source website analysis pipeline
//!
//! This crate fetches a web page together with its robots.txt and sitemap,
//! extracts static HTML metrics, metadata and keywords, renders the page in a
//! headless browser for accessibility and color sampling, runs a page-speed
//! audit, and merges everything into one uniformly-shaped report.

pub mod analysis;
pub mod audit;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod output;
pub mod render;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Headless browser failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No browser executable found")]
    BrowserNotFound,

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error("Script evaluation failed: {0}")]
    Evaluate(String),

    #[error("Browser teardown failed: {0}")]
    Teardown(String),
}

/// Accessibility and performance audit failures
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("{command} exited unsuccessfully: {stderr}")]
    Exit { command: String, stderr: String },

    #[error("Audit timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Failed to parse audit report: {0}")]
    Report(String),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Site-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analysis::{AnalysisOutcome, AnalysisReport, Analyzer, Defaulted};
pub use config::Config;
pub use url::{normalize_target, AnalysisRequest};
