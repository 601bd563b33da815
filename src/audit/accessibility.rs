//! Accessibility audit with axe-core inside a rendered page
//!
//! axe-core is injected into the live page, either from a local copy of
//! `axe.min.js` or by appending a `<script>` tag pointing at a CDN, and then
//! `axe.run(document)` is awaited. Only violations are reported.

use crate::config::RenderConfig;
use crate::render::RenderedPage;
use crate::AuditError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maps the axe results object to the violation records we keep
const RUN_SCRIPT: &str = r#"axe.run(document).then(results => results.violations.map(v => ({
    id: v.id,
    impact: v.impact || null,
    description: v.description,
    help: v.help,
    helpUrl: v.helpUrl,
    nodeCount: Array.isArray(v.nodes) ? v.nodes.length : 0
})))"#;

/// One failed accessibility rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub help_url: String,
    #[serde(default)]
    pub node_count: usize,
}

/// Accessibility findings; the default means "nothing found or not measured"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityResult {
    pub violation_count: usize,
    pub violation_details: Vec<Violation>,
}

impl AccessibilityResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            violation_count: violations.len(),
            violation_details: violations,
        }
    }
}

/// Where the axe-core script comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxeSource {
    /// A local `axe.min.js`, evaluated directly in the page
    File(PathBuf),
    /// A URL loaded through a `<script>` tag
    Cdn(String),
}

impl AxeSource {
    /// Local script when configured, CDN otherwise
    pub fn from_config(config: &RenderConfig) -> Self {
        match &config.axe_script_path {
            Some(path) => Self::File(path.clone()),
            None => Self::Cdn(config.axe_cdn_url.clone()),
        }
    }

    async fn injection_script(&self) -> Result<String, AuditError> {
        match self {
            Self::File(path) => {
                let source = tokio::fs::read_to_string(path).await?;
                // Evaluate for its side effect only; the script's completion value may not be serializable
                Ok(format!("{};\ntrue", source))
            }
            Self::Cdn(url) => {
                let quoted = serde_json::to_string(url)
                    .map_err(|e| AuditError::Report(e.to_string()))?;
                Ok(format!(
                    r#"new Promise((resolve, reject) => {{
    if (window.axe) {{ resolve(true); return; }}
    const script = document.createElement('script');
    script.src = {quoted};
    script.onload = () => resolve(true);
    script.onerror = () => reject(new Error('failed to load axe-core from ' + {quoted}));
    (document.head || document.documentElement).appendChild(script);
}})"#
                ))
            }
        }
    }
}

/// Audits a rendered page, degrading to the zero result on any failure
pub async fn audit_accessibility(page: &dyn RenderedPage, source: &AxeSource) -> AccessibilityResult {
    match run_axe(page, source).await {
        Ok(result) => {
            tracing::debug!("axe-core reported {} violations", result.violation_count);
            result
        }
        Err(e) => {
            tracing::warn!("Accessibility audit failed: {}", e);
            AccessibilityResult::default()
        }
    }
}

/// Injects axe-core and collects its violations
pub async fn run_axe(
    page: &dyn RenderedPage,
    source: &AxeSource,
) -> Result<AccessibilityResult, AuditError> {
    page.evaluate(&source.injection_script().await?).await?;

    let value = page.evaluate(RUN_SCRIPT).await?;
    let violations: Vec<Violation> = serde_json::from_value(value)
        .map_err(|e| AuditError::Report(format!("unexpected axe output: {}", e)))?;

    Ok(AccessibilityResult::from_violations(violations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{FakeLauncher, Responder};
    use crate::render::{BrowserLauncher, BrowserSession};
    use crate::RenderError;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::Arc;
    use url::Url;

    async fn open_page(launcher: &FakeLauncher) -> (Box<dyn BrowserSession>, Arc<dyn RenderedPage>) {
        let mut session = launcher.launch().await.unwrap();
        let page = session
            .open(&Url::parse("https://example.com/").unwrap())
            .await
            .unwrap();
        (session, page)
    }

    fn axe_responder() -> Responder {
        Arc::new(|script: &str| {
            if script.starts_with("axe.run") {
                Ok(json!([
                    {
                        "id": "image-alt",
                        "impact": "critical",
                        "description": "Ensures <img> elements have alternate text",
                        "help": "Images must have alternate text",
                        "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/image-alt",
                        "nodeCount": 3
                    },
                    {
                        "id": "region",
                        "impact": null,
                        "description": "Ensures all page content is contained by landmarks",
                        "help": "All page content should be contained by landmarks",
                        "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/region",
                        "nodeCount": 1
                    }
                ]))
            } else {
                Ok(Value::Bool(true))
            }
        })
    }

    #[tokio::test]
    async fn test_violations_mapped() {
        let launcher = FakeLauncher::new(axe_responder());
        let (_session, page) = open_page(&launcher).await;
        let source = AxeSource::Cdn("https://cdn.example.com/axe.min.js".to_string());

        let result = audit_accessibility(page.as_ref(), &source).await;
        assert_eq!(result.violation_count, 2);
        assert_eq!(result.violation_details[0].id, "image-alt");
        assert_eq!(result.violation_details[0].impact.as_deref(), Some("critical"));
        assert_eq!(result.violation_details[0].node_count, 3);
        assert_eq!(result.violation_details[1].impact, None);

        let scripts = launcher.scripts.lock().unwrap();
        assert!(scripts[0].contains("\"https://cdn.example.com/axe.min.js\""));
        assert!(scripts[1].starts_with("axe.run"));
    }

    #[tokio::test]
    async fn test_local_script_injected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "window.axe = {{}};").unwrap();

        let launcher = FakeLauncher::new(axe_responder());
        let (_session, page) = open_page(&launcher).await;
        let source = AxeSource::File(file.path().to_path_buf());

        let result = audit_accessibility(page.as_ref(), &source).await;
        assert_eq!(result.violation_count, 2);
        assert!(launcher.scripts.lock().unwrap()[0].starts_with("window.axe = {};"));
    }

    #[tokio::test]
    async fn test_injection_failure_defaults() {
        let launcher = FakeLauncher::new(Arc::new(|_: &str| {
            Err(RenderError::Evaluate("Refused to load the script".to_string()))
        }));
        let (_session, page) = open_page(&launcher).await;
        let source = AxeSource::Cdn("https://cdn.example.com/axe.min.js".to_string());

        assert_eq!(
            audit_accessibility(page.as_ref(), &source).await,
            AccessibilityResult::default()
        );
    }

    #[tokio::test]
    async fn test_missing_local_script_defaults() {
        let launcher = FakeLauncher::new(axe_responder());
        let (_session, page) = open_page(&launcher).await;
        let source = AxeSource::File(PathBuf::from("/nonexistent/axe.min.js"));

        let result = run_axe(page.as_ref(), &source).await;
        assert!(matches!(result, Err(AuditError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_output_is_report_error() {
        let launcher = FakeLauncher::new(Arc::new(|script: &str| {
            if script.starts_with("axe.run") {
                Ok(json!({"violations": "nope"}))
            } else {
                Ok(Value::Bool(true))
            }
        }));
        let (_session, page) = open_page(&launcher).await;
        let source = AxeSource::Cdn("https://cdn.example.com/axe.min.js".to_string());

        let result = run_axe(page.as_ref(), &source).await;
        assert!(matches!(result, Err(AuditError::Report(_))));
    }

    #[test]
    fn test_source_from_config() {
        let mut config = RenderConfig::default();
        assert!(matches!(AxeSource::from_config(&config), AxeSource::Cdn(_)));

        config.axe_script_path = Some(PathBuf::from("axe.min.js"));
        assert_eq!(
            AxeSource::from_config(&config),
            AxeSource::File(PathBuf::from("axe.min.js"))
        );
    }

    #[test]
    fn test_default_serialization() {
        let value = serde_json::to_value(AccessibilityResult::default()).unwrap();
        assert_eq!(value, json!({"violationCount": 0, "violationDetails": []}));
    }
}
