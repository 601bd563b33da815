//! Browser executable resolution

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variables that may point at a browser binary, checked in order
const ENV_VARS: &[&str] = &["CHROME_PATH", "PUPPETEER_EXECUTABLE_PATH"];

/// Binary names searched on `PATH`, in order
const BINARY_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// Finds a Chromium-family browser binary
///
/// Resolution order: the configured path, `CHROME_PATH`,
/// `PUPPETEER_EXECUTABLE_PATH`, then well-known names on `PATH`. Candidates
/// that do not exist as files are skipped.
#[derive(Debug, Clone, Default)]
pub struct BrowserLocator {
    configured: Option<PathBuf>,
    search_environment: bool,
}

impl BrowserLocator {
    /// Searches the configured path first, then the environment
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self {
            configured,
            search_environment: true,
        }
    }

    /// Only ever considers `path`; the environment is ignored
    pub fn only(path: Option<PathBuf>) -> Self {
        Self {
            configured: path,
            search_environment: false,
        }
    }

    /// Resolves a browser binary for this process
    pub fn locate(&self) -> Option<PathBuf> {
        self.locate_with(|key| std::env::var_os(key))
    }

    fn locate_with(&self, env: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
        if let Some(path) = &self.configured {
            if path.is_file() {
                return Some(path.clone());
            }
            tracing::warn!("Configured browser {} does not exist", path.display());
        }

        if !self.search_environment {
            return None;
        }

        let from_env = ENV_VARS
            .iter()
            .filter_map(|&key| env(key))
            .map(PathBuf::from)
            .find(|path| path.is_file());
        if from_env.is_some() {
            return from_env;
        }

        let search_path = env("PATH")?;
        std::env::split_paths(&search_path).find_map(|dir| find_binary(&dir))
    }
}

fn find_binary(dir: &Path) -> Option<PathBuf> {
    BINARY_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
