//! Shared fixtures: fake browser, fake page-speed runner, analyzer builder

use async_trait::async_trait;
use serde_json::{json, Value};
use site_lens::audit::{PageSpeedRunner, PerformanceAuditor};
use site_lens::config::Config;
use site_lens::fetcher::Fetcher;
use site_lens::render::{BrowserLauncher, BrowserLocator, BrowserSession, RenderedPage};
use site_lens::{Analyzer, AuditError, RenderError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A browser whose pages answer scripts from canned values
pub struct FakeBrowser {
    pub launches: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub fail_launch: bool,
    pub colors: Vec<String>,
}

impl FakeBrowser {
    pub fn working(colors: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            launches: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            fail_launch: false,
            colors: colors.iter().map(|c| c.to_string()).collect(),
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            launches: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            fail_launch: true,
            colors: Vec::new(),
        })
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

/// Launcher handle sharing counters with the test
pub struct FakeLauncher(pub Arc<FakeBrowser>);

struct FakeSession(Arc<FakeBrowser>);

struct FakePage(Arc<FakeBrowser>);

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, RenderError> {
        if self.0.fail_launch {
            return Err(RenderError::Launch(
                "Could not auto detect a chrome executable".to_string(),
            ));
        }
        self.0.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession(self.0.clone())))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn open(&mut self, _url: &Url) -> Result<Arc<dyn RenderedPage>, RenderError> {
        Ok(Arc::new(FakePage(self.0.clone())))
    }

    async fn shutdown(self: Box<Self>) -> Result<(), RenderError> {
        self.0.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RenderedPage for FakePage {
    async fn evaluate(&self, expression: &str) -> Result<Value, RenderError> {
        if expression.starts_with("axe.run") {
            Ok(json!([{
                "id": "html-has-lang",
                "impact": "serious",
                "description": "Ensures every HTML document has a lang attribute",
                "help": "<html> element must have a lang attribute",
                "helpUrl": "https://dequeuniversity.com/rules/axe/4.10/html-has-lang",
                "nodeCount": 1
            }]))
        } else if expression.contains("getComputedStyle") {
            Ok(json!(self.0.colors))
        } else {
            Ok(Value::Bool(true))
        }
    }
}

/// Runner that must never be reached
pub struct UnreachableRunner {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PageSpeedRunner for UnreachableRunner {
    async fn run(&self, _url: &Url, _port: u16) -> Result<Value, AuditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AuditError::Report("runner should not be called".to_string()))
    }
}

/// Config with short timeouts suitable for tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.fetcher.timeout_secs = 2;
    config.fetcher.user_agent = "site-lens-test/1.0".to_string();
    config.render.navigation_timeout_secs = 5;
    config.performance.timeout_secs = 5;
    config
}

/// Analyzer wired to fakes; the performance auditor never finds a browser
pub fn build_analyzer(
    config: &Config,
    browser: &Arc<FakeBrowser>,
    runner: &Arc<UnreachableRunner>,
) -> Analyzer {
    let fetcher = Fetcher::new(&config.fetcher).expect("fetcher");
    let auditor = PerformanceAuditor::new(
        BrowserLocator::only(None),
        runner.clone(),
        Duration::from_secs(config.performance.timeout_secs),
    );
    Analyzer::new(
        config,
        fetcher,
        Arc::new(FakeLauncher(browser.clone())),
        auditor,
    )
}

pub fn unreachable_runner() -> Arc<UnreachableRunner> {
    Arc::new(UnreachableRunner {
        calls: AtomicUsize::new(0),
    })
}
