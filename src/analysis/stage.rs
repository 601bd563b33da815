/// Stages of a single analysis run
///
/// A run moves strictly forward:
/// `FetchingPrimary -> (Failed | Extracting) -> Rendering -> Composing -> Done`.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    // ===== Active Stages =====
    /// Retrieving the target page; nothing else has happened yet
    FetchingPrimary,

    /// Static extraction, metadata, keywords and site signals
    Extracting,

    /// Browser-backed branches (accessibility, colors, performance)
    Rendering,

    /// Merging results into the report
    Composing,

    // ===== Terminal Stages =====
    /// Report produced
    Done,

    /// Primary fetch failed; no further work was done
    Failed,
}

impl AnalysisStage {
    /// Returns true if `next` directly follows this stage
    pub fn can_transition_to(&self, next: AnalysisStage) -> bool {
        matches!(
            (self, next),
            (Self::FetchingPrimary, Self::Extracting)
                | (Self::FetchingPrimary, Self::Failed)
                | (Self::Extracting, Self::Rendering)
                | (Self::Rendering, Self::Composing)
                | (Self::Composing, Self::Done)
        )
    }

    /// Moves to `next`, logging the transition
    ///
    /// An illegal transition is logged and leaves the stage unchanged.
    pub fn advance(&mut self, next: AnalysisStage) -> bool {
        if self.can_transition_to(next) {
            tracing::debug!("Analysis stage: {} -> {}", self, next);
            *self = next;
            true
        } else {
            tracing::error!("Illegal analysis stage transition: {} -> {}", self, next);
            false
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchingPrimary => "fetching_primary",
            Self::Extracting => "extracting",
            Self::Rendering => "rendering",
            Self::Composing => "composing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
