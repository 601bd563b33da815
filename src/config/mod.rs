//! Configuration module for Site-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file (or no file at all) yields a
//! usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use site_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-lens.toml")).unwrap();
//! println!("Keyword limit: {}", config.keywords.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, KeywordConfig, PerformanceConfig, RenderConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
