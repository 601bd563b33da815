//! Page-speed runner backed by the Lighthouse CLI

use super::performance::PerformanceResult;
use crate::AuditError;
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// Produces a page-speed report for a URL using an already running browser
#[async_trait]
pub trait PageSpeedRunner: Send + Sync {
    /// Audits `url` through the browser listening on `debugging_port`
    ///
    /// Returns the raw Lighthouse-format JSON report.
    async fn run(&self, url: &Url, debugging_port: u16) -> Result<Value, AuditError>;
}

/// Shells out to `lighthouse`
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    command: String,
}

impl LighthouseCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn args(url: &Url, debugging_port: u16) -> Vec<String> {
        vec![
            url.to_string(),
            format!("--port={}", debugging_port),
            "--output=json".to_string(),
            "--only-categories=performance".to_string(),
            "--quiet".to_string(),
        ]
    }
}

#[async_trait]
impl PageSpeedRunner for LighthouseCli {
    async fn run(&self, url: &Url, debugging_port: u16) -> Result<Value, AuditError> {
        tracing::debug!("Running {} against {} (port {})", self.command, url, debugging_port);

        let output = tokio::process::Command::new(&self.command)
            .args(Self::args(url, debugging_port))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AuditError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuditError::Exit {
                command: self.command.clone(),
                stderr: stderr.lines().last().unwrap_or("").trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| AuditError::Report(format!("invalid JSON from {}: {}", self.command, e)))
    }
}

/// Maps a Lighthouse report to a performance result
///
/// Missing, null or negative numbers become 0 and the score is clamped to
/// 0–100. A document without a `categories` object is not a report at all.
pub fn parse_lighthouse_report(report: &Value) -> Result<PerformanceResult, AuditError> {
    if !report.get("categories").is_some_and(Value::is_object) {
        return Err(AuditError::Report(
            "report has no categories object".to_string(),
        ));
    }

    let score = non_negative(report.pointer("/categories/performance/score"));
    let audit = |id: &str| non_negative(report.pointer(&format!("/audits/{}/numericValue", id)));

    Ok(PerformanceResult {
        performance_score: (score * 100.0).round().clamp(0.0, 100.0),
        lcp: audit("largest-contentful-paint"),
        cls: audit("cumulative-layout-shift"),
        tbt: audit("total-blocking-time"),
        measured: true,
    })
}

fn non_negative(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(0.0)
}
