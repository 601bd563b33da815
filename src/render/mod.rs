//! Headless browser rendering
//!
//! The pipeline never touches a browser directly. It goes through three
//! traits:
//! - `BrowserLauncher` starts an isolated browser
//! - `BrowserSession` opens pages in it and tears it down
//! - `RenderedPage` evaluates JavaScript in a loaded page
//!
//! `with_rendered_page` is the only way the pipeline acquires a page, and it
//! tears the browser down on every exit path.

mod chromium;
pub mod colors;
mod locator;

pub use chromium::ChromiumLauncher;
pub use colors::{contrast_ratio, sample_colors, ColorPalette, MAX_PALETTE_COLORS};
pub use locator::BrowserLocator;

use crate::analysis::Defaulted;
use crate::RenderError;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Starts headless browsers
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launches a fresh, isolated browser
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, RenderError>;
}

/// A running browser owned by one analysis
#[async_trait]
pub trait BrowserSession: Send {
    /// Opens `url` in a new page and waits for it to finish loading
    async fn open(&mut self, url: &Url) -> Result<Arc<dyn RenderedPage>, RenderError>;

    /// Closes the browser, killing the process if a graceful close fails
    async fn shutdown(self: Box<Self>) -> Result<(), RenderError>;
}

/// A loaded page that can run scripts
#[async_trait]
pub trait RenderedPage: Send + Sync {
    /// Evaluates an expression, awaiting it if it returns a promise
    ///
    /// The result comes back by value as JSON; `undefined` maps to `Null`.
    async fn evaluate(&self, expression: &str) -> Result<Value, RenderError>;
}

/// Runs `callback` against `url` rendered in a fresh browser
///
/// Navigation is bounded by `navigation_timeout`. The browser is shut down
/// after the callback returns, after a navigation failure and after a
/// navigation timeout. A failing shutdown is logged and does not change the
/// result.
pub async fn with_rendered_page<T, F, Fut>(
    launcher: &dyn BrowserLauncher,
    url: &Url,
    navigation_timeout: Duration,
    callback: F,
) -> Result<T, Defaulted>
where
    F: FnOnce(Arc<dyn RenderedPage>) -> Fut,
    Fut: Future<Output = Result<T, Defaulted>>,
{
    let mut session = launcher.launch().await?;
    tracing::debug!("Browser launched for {}", url);

    let outcome = match tokio::time::timeout(navigation_timeout, session.open(url)).await {
        Ok(Ok(page)) => callback(page).await,
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            tracing::warn!(
                "Navigation to {} timed out after {}s",
                url,
                navigation_timeout.as_secs()
            );
            Err(Defaulted::Timeout)
        }
    };

    match session.shutdown().await {
        Ok(()) => tracing::debug!("Browser for {} shut down", url),
        Err(e) => tracing::error!("Browser teardown for {} failed: {}", url, e),
    }

    outcome
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn null_responder() -> Responder {
        Arc::new(|_: &str| Ok(Value::Null))
    }

    #[tokio::test]
    async fn test_callback_result_returned_and_browser_closed() {
        let launcher = FakeLauncher::new(Arc::new(|_: &str| Ok(json!(42))));
        let result = with_rendered_page(&launcher, &url(), Duration::from_secs(5), |page| async move {
            page.evaluate("6 * 7").await.map_err(Defaulted::from)
        })
        .await;

        assert_eq!(result, Ok(json!(42)));
        assert_eq!(launcher.counters.launches(), 1);
        assert_eq!(launcher.counters.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_callback_error_still_closes_browser() {
        let launcher = FakeLauncher::new(null_responder());
        let result: Result<(), Defaulted> =
            with_rendered_page(&launcher, &url(), Duration::from_secs(5), |_| async {
                Err(Defaulted::Render("callback failed".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Defaulted::Render(_))));
        assert_eq!(launcher.counters.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_browser() {
        let mut launcher = FakeLauncher::new(null_responder());
        launcher.fail_open = true;
        let result: Result<(), Defaulted> =
            with_rendered_page(&launcher, &url(), Duration::from_secs(5), |_| async { Ok(()) })
                .await;

        assert!(matches!(result, Err(Defaulted::Render(_))));
        assert_eq!(launcher.counters.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_navigation_timeout_closes_browser() {
        let mut launcher = FakeLauncher::new(null_responder());
        launcher.hang_open = true;
        let result: Result<(), Defaulted> =
            with_rendered_page(&launcher, &url(), Duration::from_millis(50), |_| async { Ok(()) })
                .await;

        assert_eq!(result, Err(Defaulted::Timeout));
        assert_eq!(launcher.counters.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_launch_failure_never_runs_callback() {
        let mut launcher = FakeLauncher::new(null_responder());
        launcher.fail_launch = true;
        let ran = std::sync::atomic::AtomicBool::new(false);
        let result: Result<(), Defaulted> =
            with_rendered_page(&launcher, &url(), Duration::from_secs(5), |_| async {
                ran.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(Defaulted::Render(_))));
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
        assert_eq!(launcher.counters.shutdowns(), 0);
    }
}
