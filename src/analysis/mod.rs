//! Analysis pipeline
//!
//! This module ties the collectors together:
//! - `Analyzer` runs one analysis per call and always returns an outcome
//! - `AnalysisStage` tracks where a run is and which moves are legal
//! - `AnalysisReport` is the fixed-shape result handed to consumers
//! - `Defaulted` says why a sub-step fell back to its default

mod pipeline;
mod report;
mod signals;
mod stage;

pub use pipeline::Analyzer;
pub use report::{AnalysisOutcome, AnalysisReport, FETCH_FAILED_MESSAGE, SCHEMA_VERSION};
pub use signals::{resolve_site_signals, SiteSignals};
pub use stage::AnalysisStage;

use crate::{AuditError, RenderError};
use thiserror::Error;

/// Why a sub-step produced its default value instead of a measurement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Defaulted {
    #[error("no browser executable available")]
    BrowserUnavailable,

    #[error("disabled by configuration")]
    Disabled,

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("audit failed: {0}")]
    Audit(String),

    #[error("timed out")]
    Timeout,

    #[error("scraping failed: {0}")]
    Scrape(String),
}

impl Defaulted {
    /// True when the default is expected rather than a malfunction
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::BrowserUnavailable | Self::Disabled)
    }

    /// Logs the fallback for `step` at the level its cause deserves
    pub fn log(&self, step: &str) {
        if self.is_expected() {
            tracing::info!("{} skipped: {}", step, self);
        } else {
            tracing::warn!("{} degraded to defaults: {}", step, self);
        }
    }
}

impl From<RenderError> for Defaulted {
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::BrowserNotFound => Self::BrowserUnavailable,
            RenderError::NavigationTimeout { .. } => Self::Timeout,
            other => Self::Render(other.to_string()),
        }
    }
}

impl From<AuditError> for Defaulted {
    fn from(error: AuditError) -> Self {
        match error {
            AuditError::Timeout { .. } => Self::Timeout,
            AuditError::Render(render) => render.into(),
            other => Self::Audit(other.to_string()),
        }
    }
}
