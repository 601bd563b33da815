//! The aggregate report and the outcome wrapper around it

use super::signals::SiteSignals;
use crate::audit::{AccessibilityResult, PerformanceResult};
use crate::extract::{HtmlMetrics, Metadata, SocialLink};
use crate::render::ColorPalette;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the report layout; bumped on any incompatible change
pub const SCHEMA_VERSION: u32 = 1;

/// The only error a consumer ever sees
pub const FETCH_FAILED_MESSAGE: &str = "Page could not be fetched";

/// Everything learned about one page
///
/// Every section is always present. Sections whose collector failed carry
/// their documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub url: String,
    pub html_metrics: HtmlMetrics,
    pub metadata: Metadata,
    pub site_signals: SiteSignals,
    pub accessibility: AccessibilityResult,
    pub performance: PerformanceResult,
    pub keywords: Vec<String>,
    pub colors: ColorPalette,
    pub social_links: Vec<SocialLink>,
    pub analyzed_at: DateTime<Utc>,
}

/// Result of one analysis
///
/// Serializes untagged: a report as itself, a failure as
/// `{"error": "Page could not be fetched"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Report(Box<AnalysisReport>),
    Failed { error: String },
}

impl AnalysisOutcome {
    /// The fetch-failure outcome
    pub fn fetch_failed() -> Self {
        Self::Failed {
            error: FETCH_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
