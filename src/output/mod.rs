//! Output module for writing analysis results
//!
//! This module handles:
//! - Serializing an outcome as pretty-printed JSON (the consumer format)
//! - Rendering a markdown summary of a report
//! - Writing either to a file or to stdout

mod markdown;

pub use markdown::format_markdown_report;

use crate::analysis::AnalysisOutcome;
use crate::LensError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output formats supported by the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The report document itself
    #[default]
    Json,
    /// A tabular human-readable summary
    Markdown,
}

/// Renders an outcome in the requested format
pub fn render_outcome(outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String, LensError> {
    match format {
        OutputFormat::Json => Ok(outcome.to_json_pretty()?),
        OutputFormat::Markdown => Ok(format_markdown_report(outcome)),
    }
}

/// Writes an outcome to `path`, or to stdout when no path is given
///
/// # Arguments
///
/// * `outcome` - The analysis outcome
/// * `format` - Output format
/// * `path` - Destination file; created or truncated
pub fn write_outcome(
    outcome: &AnalysisOutcome,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), LensError> {
    let mut rendered = render_outcome(outcome, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_outcome(&AnalysisOutcome::fetch_failed(), OutputFormat::Json, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, serde_json::json!({"error": "Page could not be fetched"}));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_render_markdown() {
        let rendered =
            render_outcome(&AnalysisOutcome::fetch_failed(), OutputFormat::Markdown).unwrap();
        assert!(rendered.starts_with("# Site-Lens Report"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let result = write_outcome(&AnalysisOutcome::fetch_failed(), OutputFormat::Json, Some(&path));
        assert!(matches!(result, Err(LensError::Io(_))));
    }
}
