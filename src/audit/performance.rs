//! Page-speed audit in a dedicated browser process
//!
//! The auditor owns the whole lifecycle:
//! 1. Resolve a browser binary (none means the audit is skipped)
//! 2. Reserve a free local port for remote debugging
//! 3. Spawn headless Chromium on that port and wait until it listens
//! 4. Hand the port to the page-speed runner, bounded by the audit timeout
//! 5. Kill and reap the browser, whatever happened before

use super::lighthouse::{parse_lighthouse_report, PageSpeedRunner};
use crate::analysis::Defaulted;
use crate::render::BrowserLocator;
use crate::AuditError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::{Child, Command};
use url::Url;

/// How long a freshly spawned browser gets to open its debugging port
const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);

const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Core web vitals and the overall performance score
///
/// `measured` is false for the all-zero default, so consumers can tell a
/// real zero from a skipped audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResult {
    /// Lighthouse performance score, 0–100
    pub performance_score: f64,
    /// Largest contentful paint (ms)
    pub lcp: f64,
    /// Cumulative layout shift
    pub cls: f64,
    /// Total blocking time (ms)
    pub tbt: f64,
    pub measured: bool,
}

/// Runs page-speed audits, one private browser per audit
#[derive(Clone)]
pub struct PerformanceAuditor {
    locator: BrowserLocator,
    runner: Arc<dyn PageSpeedRunner>,
    timeout: Duration,
}

impl std::fmt::Debug for PerformanceAuditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceAuditor")
            .field("locator", &self.locator)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PerformanceAuditor {
    pub fn new(locator: BrowserLocator, runner: Arc<dyn PageSpeedRunner>, timeout: Duration) -> Self {
        Self {
            locator,
            runner,
            timeout,
        }
    }

    /// Audits `url`
    ///
    /// Fails with `Defaulted::BrowserUnavailable` when no browser binary can
    /// be found; the caller substitutes the zero result.
    pub async fn audit(&self, url: &Url) -> Result<PerformanceResult, Defaulted> {
        let executable = self.locator.locate().ok_or(Defaulted::BrowserUnavailable)?;
        let port = reserve_port()?;

        let mut browser = BrowserProcess::spawn(&executable, port)?;
        tracing::debug!(
            "Started {} for page-speed audit on port {}",
            executable.display(),
            port
        );

        let outcome = tokio::time::timeout(self.timeout, async {
            browser.wait_until_listening(STARTUP_TIMEOUT).await?;
            self.runner.run(url, port).await
        })
        .await;

        browser.terminate().await;

        let report = match outcome {
            Ok(report) => report?,
            Err(_) => {
                return Err(AuditError::Timeout {
                    secs: self.timeout.as_secs(),
                }
                .into())
            }
        };

        let result = parse_lighthouse_report(&report)?;
        tracing::info!(
            "Performance score {} (LCP {:.0}ms, CLS {:.3}, TBT {:.0}ms)",
            result.performance_score,
            result.lcp,
            result.cls,
            result.tbt
        );
        Ok(result)
    }
}

/// Finds a free local TCP port by binding port 0 and releasing it
pub fn reserve_port() -> Result<u16, AuditError> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))?;
    Ok(listener.local_addr()?.port())
}

/// A headless browser child process, killed when dropped
struct BrowserProcess {
    child: Child,
    port: u16,
    profile_dir: PathBuf,
}

impl BrowserProcess {
    fn spawn(executable: &Path, port: u16) -> Result<Self, AuditError> {
        let profile_dir =
            std::env::temp_dir().join(format!("site-lens-perf-{}-{}", std::process::id(), port));

        let child = Command::new(executable)
            .arg("--headless=new")
            .arg(format!("--remote-debugging-port={}", port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .args([
                "--no-first-run",
                "--no-default-browser-check",
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--no-sandbox",
                "about:blank",
            ])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AuditError::Spawn {
                command: executable.display().to_string(),
                source,
            })?;

        Ok(Self {
            child,
            port,
            profile_dir,
        })
    }

    /// Polls the debugging port until it accepts connections
    async fn wait_until_listening(&mut self, limit: Duration) -> Result<(), AuditError> {
        let deadline = tokio::time::Instant::now() + limit;
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));

        loop {
            if tokio::net::TcpStream::connect(address).await.is_ok() {
                return Ok(());
            }
            if let Some(status) = self.child.try_wait()? {
                return Err(AuditError::Exit {
                    command: "browser".to_string(),
                    stderr: format!("exited during startup with {}", status),
                });
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(AuditError::Timeout {
                    secs: limit.as_secs(),
                });
            }
            tokio::time::sleep(STARTUP_POLL_INTERVAL).await;
        }
    }

    /// Kills the process and reaps it
    async fn terminate(mut self) {
        let already_exited = matches!(self.child.try_wait(), Ok(Some(_)));
        if !already_exited {
            if let Err(e) = self.child.kill().await {
                tracing::error!("Failed to kill audit browser on port {}: {}", self.port, e);
            }
        }
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            tracing::debug!(
                "Could not remove profile directory {}: {}",
                self.profile_dir.display(),
                e
            );
        }
    }
}
