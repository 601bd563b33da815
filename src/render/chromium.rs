//! Chromium-backed rendering through the DevTools protocol

use super::{BrowserLauncher, BrowserLocator, BrowserSession, RenderedPage};
use crate::RenderError;
use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Time allowed for a graceful close before the process is killed
const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Distinguishes profile directories of concurrent launches within a process
static LAUNCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Launches headless Chromium, one browser per analysis
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    locator: BrowserLocator,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    pub fn new(locator: BrowserLocator, request_timeout: Duration) -> Self {
        Self {
            locator,
            request_timeout,
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, RenderError> {
        let executable = self.locator.locate().ok_or(RenderError::BrowserNotFound)?;
        let profile_dir = std::env::temp_dir().join(format!(
            "site-lens-{}-{}",
            std::process::id(),
            LAUNCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let config = BrowserConfig::builder()
            .chrome_executable(&executable)
            .user_data_dir(&profile_dir)
            .request_timeout(self.request_timeout)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // The handler drives the DevTools connection and must be polled until the browser exits
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        tracing::debug!("Launched {} (profile {})", executable.display(), profile_dir.display());

        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
            profile_dir,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn open(&mut self, url: &Url) -> Result<Arc<dyn RenderedPage>, RenderError> {
        let navigation_error = |e: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(navigation_error)?;
        page.goto(url.as_str()).await.map_err(navigation_error)?;
        page.wait_for_navigation().await.map_err(navigation_error)?;

        Ok(Arc::new(ChromiumPage { page }))
    }

    async fn shutdown(mut self: Box<Self>) -> Result<(), RenderError> {
        let closed = match tokio::time::timeout(CLOSE_TIMEOUT, self.browser.close()).await {
            Ok(Ok(_)) => self
                .browser
                .wait()
                .await
                .map(|_| ())
                .map_err(|e| RenderError::Teardown(e.to_string())),
            Ok(Err(e)) => Err(RenderError::Teardown(e.to_string())),
            Err(_) => Err(RenderError::Teardown(format!(
                "close did not finish within {}s",
                CLOSE_TIMEOUT.as_secs()
            ))),
        };

        if closed.is_err() {
            if let Some(Err(e)) = self.browser.kill().await {
                tracing::error!("Failed to kill browser process: {}", e);
            }
        }

        self.handler_task.abort();
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            tracing::debug!(
                "Could not remove profile directory {}: {}",
                self.profile_dir.display(),
                e
            );
        }

        closed
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl RenderedPage for ChromiumPage {
    async fn evaluate(&self, expression: &str) -> Result<Value, RenderError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(RenderError::Evaluate)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| RenderError::Evaluate(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}
