//! The analysis pipeline
//!
//! One call to `Analyzer::analyze` runs the stages in order:
//! 1. Fetch the target page (the only hard dependency)
//! 2. Extract static signals from the fetched HTML and resolve site signals
//! 3. Run the rendering branch and the performance branch concurrently
//! 4. Compose the report
//!
//! Every step after the primary fetch degrades to its default on failure.

use super::report::{AnalysisOutcome, AnalysisReport, SCHEMA_VERSION};
use super::signals::resolve_site_signals;
use super::stage::AnalysisStage;
use super::Defaulted;
use crate::audit::{
    audit_accessibility, AccessibilityResult, AxeSource, LighthouseCli, PerformanceAuditor,
    PerformanceResult,
};
use crate::config::Config;
use crate::extract::{
    body_text, extract_social_links, metrics_from_document, HtmlMetrics, KeywordExtractor, Metadata,
    MetadataRules, SocialLink,
};
use crate::fetcher::Fetcher;
use crate::render::{
    sample_colors, with_rendered_page, BrowserLauncher, BrowserLocator, ChromiumLauncher,
    ColorPalette,
};
use crate::url::AnalysisRequest;
use chrono::Utc;
use scraper::Html;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Browser-backed collectors and their settings
struct RenderBranch {
    launcher: Arc<dyn BrowserLauncher>,
    axe: AxeSource,
    navigation_timeout: Duration,
}

/// Signals derived from the fetched HTML alone
struct StaticFindings {
    html_metrics: HtmlMetrics,
    metadata: Metadata,
    keywords: Vec<String>,
    social_links: Vec<SocialLink>,
}

/// Runs analyses
///
/// Construct once and reuse; every analysis is independent and the analyzer
/// holds no per-request state.
pub struct Analyzer {
    fetcher: Fetcher,
    user_agent: String,
    rules: MetadataRules,
    keywords: KeywordExtractor,
    render: Option<RenderBranch>,
    performance: Option<PerformanceAuditor>,
}

impl Analyzer {
    /// Builds an analyzer with Chromium rendering and the Lighthouse CLI
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        let locator = BrowserLocator::new(config.render.chrome_executable.clone());

        let launcher = Arc::new(ChromiumLauncher::new(
            locator.clone(),
            Duration::from_secs(config.render.navigation_timeout_secs),
        ));
        let performance = PerformanceAuditor::new(
            locator,
            Arc::new(LighthouseCli::new(
                config.performance.lighthouse_command.clone(),
            )),
            Duration::from_secs(config.performance.timeout_secs),
        );

        Ok(Self::new(config, fetcher, launcher, performance))
    }

    /// Builds an analyzer from explicit collaborators
    ///
    /// Branches disabled in `config` are never run, whatever is passed here.
    pub fn new(
        config: &Config,
        fetcher: Fetcher,
        launcher: Arc<dyn BrowserLauncher>,
        performance: PerformanceAuditor,
    ) -> Self {
        let render = config.render.enabled.then(|| RenderBranch {
            launcher,
            axe: AxeSource::from_config(&config.render),
            navigation_timeout: Duration::from_secs(config.render.navigation_timeout_secs),
        });

        Self {
            fetcher,
            user_agent: config.fetcher.user_agent.clone(),
            rules: MetadataRules::standard(),
            keywords: KeywordExtractor::new(config.keywords.limit)
                .with_stopwords(&config.keywords.extra_stopwords),
            render,
            performance: config.performance.enabled.then_some(performance),
        }
    }

    /// Replaces the metadata rule chain
    pub fn with_rules(mut self, rules: MetadataRules) -> Self {
        self.rules = rules;
        self
    }

    /// Analyzes a raw target such as `"example.com"`
    ///
    /// A target that cannot be normalized into an http(s) URL is reported
    /// like an unreachable page.
    pub async fn analyze(&self, target: &str) -> AnalysisOutcome {
        match AnalysisRequest::new(target) {
            Ok(request) => self.analyze_request(&request).await,
            Err(e) => {
                tracing::warn!("Rejected target {:?}: {}", target, e);
                AnalysisOutcome::fetch_failed()
            }
        }
    }

    /// Analyzes an already normalized request
    pub async fn analyze_request(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let started = Instant::now();
        let url = request.target_url();
        let mut stage = AnalysisStage::FetchingPrimary;
        tracing::info!("Analyzing {}", url);

        let Some(html) = self.fetcher.fetch(url.as_str()).await else {
            tracing::warn!("Primary fetch of {} failed", url);
            stage.advance(AnalysisStage::Failed);
            return AnalysisOutcome::fetch_failed();
        };

        stage.advance(AnalysisStage::Extracting);
        let findings = self.extract(&html, url);
        let site_signals = resolve_site_signals(&self.fetcher, request, &self.user_agent).await;

        stage.advance(AnalysisStage::Rendering);
        let ((accessibility, colors), performance) =
            tokio::join!(self.render_branch(url), self.performance_branch(url));

        stage.advance(AnalysisStage::Composing);
        let report = AnalysisReport {
            schema_version: SCHEMA_VERSION,
            url: url.to_string(),
            html_metrics: findings.html_metrics,
            metadata: findings.metadata,
            site_signals,
            accessibility,
            performance,
            keywords: findings.keywords,
            colors,
            social_links: findings.social_links,
            analyzed_at: Utc::now(),
        };

        stage.advance(AnalysisStage::Done);
        tracing::info!(
            "Analysis of {} finished in {:.1}s",
            url,
            started.elapsed().as_secs_f64()
        );
        AnalysisOutcome::Report(Box::new(report))
    }

    /// Runs every static collector over the fetched HTML
    fn extract(&self, html: &str, url: &Url) -> StaticFindings {
        let document = Html::parse_document(html);

        let metadata = self.rules.scrape(html, url).unwrap_or_else(|reason| {
            reason.log("Metadata scraping");
            Metadata::default()
        });

        let findings = StaticFindings {
            html_metrics: metrics_from_document(&document),
            metadata,
            keywords: self.keywords.extract(&body_text(&document)),
            social_links: extract_social_links(&document, url),
        };

        tracing::debug!(
            "Extracted {} words, {} metadata fields, {} keywords, {} social links",
            findings.html_metrics.word_count,
            findings.metadata.len(),
            findings.keywords.len(),
            findings.social_links.len()
        );
        findings
    }

    /// Accessibility audit and color sampling in one rendered page
    async fn render_branch(&self, url: &Url) -> (AccessibilityResult, ColorPalette) {
        let Some(render) = &self.render else {
            Defaulted::Disabled.log("Rendering");
            return Default::default();
        };

        let axe = &render.axe;
        let rendered = with_rendered_page(
            render.launcher.as_ref(),
            url,
            render.navigation_timeout,
            |page| async move {
                let accessibility = audit_accessibility(page.as_ref(), axe).await;
                let colors = sample_colors(page.as_ref()).await.unwrap_or_else(|reason| {
                    reason.log("Color sampling");
                    ColorPalette::default()
                });
                Ok::<_, Defaulted>((accessibility, colors))
            },
        )
        .await;

        rendered.unwrap_or_else(|reason| {
            reason.log("Rendering");
            Default::default()
        })
    }

    async fn performance_branch(&self, url: &Url) -> PerformanceResult {
        let Some(auditor) = &self.performance else {
            Defaulted::Disabled.log("Performance audit");
            return PerformanceResult::default();
        };

        auditor.audit(url).await.unwrap_or_else(|reason| {
            reason.log("Performance audit");
            PerformanceResult::default()
        })
    }
}
