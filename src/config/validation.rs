use crate::config::types::{Config, FetcherConfig, KeywordConfig, PerformanceConfig, RenderConfig};
use crate::ConfigError;
use url::Url;

const MAX_TIMEOUT_SECS: u64 = 600;
const MAX_KEYWORD_LIMIT: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_render_config(&config.render)?;
    validate_performance_config(&config.performance)?;
    validate_keyword_config(&config.keywords)?;
    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs < 1 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {} seconds, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    validate_timeout("fetcher.timeout-secs", config.timeout_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fetcher.user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rendering configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    validate_timeout(
        "render.navigation-timeout-secs",
        config.navigation_timeout_secs,
    )?;

    let url = Url::parse(&config.axe_cdn_url).map_err(|e| {
        ConfigError::Validation(format!(
            "render.axe-cdn-url '{}' is not a valid URL: {}",
            config.axe_cdn_url, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "render.axe-cdn-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates performance audit configuration
fn validate_performance_config(config: &PerformanceConfig) -> Result<(), ConfigError> {
    validate_timeout("performance.timeout-secs", config.timeout_secs)?;

    if config.lighthouse_command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "performance.lighthouse-command cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates keyword configuration
fn validate_keyword_config(config: &KeywordConfig) -> Result<(), ConfigError> {
    if config.limit < 1 || config.limit > MAX_KEYWORD_LIMIT {
        return Err(ConfigError::Validation(format!(
            "keywords.limit must be between 1 and {}, got {}",
            MAX_KEYWORD_LIMIT, config.limit
        )));
    }

    if config.extra_stopwords.iter().any(|w| w.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords.extra-stopwords cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}
