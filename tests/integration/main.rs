//! Integration tests for Site-Lens
//!
//! wiremock serves the target site; the browser is replaced by in-process
//! fakes so no Chromium or Lighthouse installation is needed.

mod analyze_tests;
mod support;
