//! Site-Lens main entry point
//!
//! This is the command-line interface for the Site-Lens website analyzer.

use anyhow::Context;
use clap::Parser;
use site_lens::config::{load_config_with_hash, Config};
use site_lens::output::{write_outcome, OutputFormat};
use site_lens::{AnalysisOutcome, AnalysisRequest, Analyzer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the target page could not be fetched
const EXIT_FETCH_FAILED: u8 = 2;

/// Site-Lens: a multi-source website analyzer
///
/// Site-Lens fetches a page with its robots.txt and sitemap, extracts
/// metadata and keywords, audits accessibility and performance in a headless
/// browser, and prints one JSON report.
#[derive(Parser, Debug)]
#[command(name = "site-lens")]
#[command(version)]
#[command(about = "A multi-source website analyzer", long_about = None)]
struct Cli {
    /// Page to analyze; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Skip the headless rendering branch (accessibility and colors)
    #[arg(long)]
    no_render: bool,

    /// Skip the page-speed audit
    #[arg(long)]
    no_performance: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(outcome) if outcome.is_report() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FETCH_FAILED),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_lens=info,warn"),
            1 => EnvFilter::new("site_lens=debug,info"),
            2 => EnvFilter::new("site_lens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration, runs one analysis and writes the outcome
async fn run(cli: Cli) -> anyhow::Result<AnalysisOutcome> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.no_render {
        config.render.enabled = false;
    }
    if cli.no_performance {
        config.performance.enabled = false;
    }

    let request = AnalysisRequest::new(&cli.url)
        .with_context(|| format!("Invalid target URL {:?}", cli.url))?;
    let analyzer = Analyzer::from_config(&config).context("Failed to set up analyzer")?;

    let outcome = analyzer.analyze_request(&request).await;
    write_outcome(&outcome, cli.format, cli.output.as_deref()).context("Failed to write report")?;

    Ok(outcome)
}
