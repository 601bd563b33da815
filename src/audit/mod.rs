//! Audits that need a real browser
//!
//! - Accessibility: axe-core injected into a page rendered by `crate::render`
//! - Performance: a page-speed runner (Lighthouse) driving its own browser process
//!
//! Each audit reports its failures as errors; the pipeline decides on defaults.

pub mod accessibility;
mod lighthouse;
pub mod performance;

pub use accessibility::{audit_accessibility, AccessibilityResult, AxeSource, Violation};
pub use lighthouse::{parse_lighthouse_report, LighthouseCli, PageSpeedRunner};
pub use performance::{reserve_port, PerformanceAuditor, PerformanceResult};
