//! Character arcs - each character's own development track.

use serde::{Deserialize, Serialize};

use crate::journey::Stage;

/// Progress gained each time a character takes part in the player's action.
pub const ARC_PROGRESS_STEP: u8 = 10;
/// Progress at which an arc phase is complete.
pub const ARC_PHASE_COMPLETE: u8 = 100;

/// Phase of a character arc. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArcPhase {
    #[default]
    Introduction,
    Development,
    Conflict,
    Resolution,
    Completion,
}

impl ArcPhase {
    /// The following phase, `None` once the arc is complete.
    pub fn next(&self) -> Option<ArcPhase> {
        match self {
            ArcPhase::Introduction => Some(ArcPhase::Development),
            ArcPhase::Development => Some(ArcPhase::Conflict),
            ArcPhase::Conflict => Some(ArcPhase::Resolution),
            ArcPhase::Resolution => Some(ArcPhase::Completion),
            ArcPhase::Completion => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArcPhase::Introduction => "introduction",
            ArcPhase::Development => "development",
            ArcPhase::Conflict => "conflict",
            ArcPhase::Resolution => "resolution",
            ArcPhase::Completion => "completion",
        }
    }
}

impl std::fmt::Display for ArcPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A character's development arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterArc {
    introduction_stage: Stage,
    phase: ArcPhase,
    progress: u8,
    development_points: Vec<String>,
}

impl CharacterArc {
    /// Start an arc for a character introduced during `stage`.
    pub fn new(introduction_stage: Stage) -> Self {
        Self {
            introduction_stage,
            phase: ArcPhase::Introduction,
            progress: 0,
            development_points: Vec::new(),
        }
    }

    pub fn introduction_stage(&self) -> Stage {
        self.introduction_stage
    }

    pub fn phase(&self) -> ArcPhase {
        self.phase
    }

    /// Progress through the current phase, in `[0, 100]`.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn development_points(&self) -> &[String] {
        &self.development_points
    }

    pub fn latest_development(&self) -> Option<&str> {
        self.development_points.last().map(String::as_str)
    }

    /// Add one progress step. When the phase completes, a development point is
    /// noted and the arc moves to the next phase with progress reset to zero.
    ///
    /// Returns the new phase if the arc advanced. A completed arc saturates at
    /// full progress.
    pub fn step(&mut self) -> Option<ArcPhase> {
        self.progress = self
            .progress
            .saturating_add(ARC_PROGRESS_STEP)
            .min(ARC_PHASE_COMPLETE);

        if self.progress < ARC_PHASE_COMPLETE {
            return None;
        }

        let next = self.phase.next()?;
        self.development_points
            .push(format!("Completed arc: {}", self.phase));
        self.phase = next;
        self.progress = 0;
        Some(next)
    }
}
