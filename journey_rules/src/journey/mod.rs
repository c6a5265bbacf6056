//! Journey mechanics: the twelve stages, per-stage goals, and player knowledge.

mod goal;
mod knowledge;

pub use goal::*;
pub use knowledge::*;

use serde::{Deserialize, Serialize};

/// A stage of the dramatic arc.
///
/// Stages are totally ordered by their position in [`Stage::ALL`]. The journey
/// only ever moves forward, and [`Stage::ReturnWithElixir`] has no successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    OrdinaryWorld,
    CallToAdventure,
    RefusalOfCall,
    MeetingMentor,
    CrossingThreshold,
    TestsAlliesEnemies,
    ApproachOrdeal,
    Ordeal,
    Reward,
    RoadBack,
    Resurrection,
    ReturnWithElixir,
}

impl Stage {
    /// Every stage in journey order.
    pub const ALL: [Stage; 12] = [
        Stage::OrdinaryWorld,
        Stage::CallToAdventure,
        Stage::RefusalOfCall,
        Stage::MeetingMentor,
        Stage::CrossingThreshold,
        Stage::TestsAlliesEnemies,
        Stage::ApproachOrdeal,
        Stage::Ordeal,
        Stage::Reward,
        Stage::RoadBack,
        Stage::Resurrection,
        Stage::ReturnWithElixir,
    ];

    /// The stage every journey starts in.
    pub fn first() -> Self {
        Stage::ALL[0]
    }

    /// Position of this stage in [`Stage::ALL`].
    pub fn index(&self) -> usize {
        Stage::ALL
            .iter()
            .position(|stage| stage == self)
            .unwrap_or_default()
    }

    /// The stage that follows this one, or `None` for the terminal stage.
    pub fn next(&self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }

    /// Look up a stage by its tag, ignoring case: `"ORDINARY_WORLD"` and
    /// `"ordinary_world"` both name [`Stage::OrdinaryWorld`].
    pub fn from_tag(tag: &str) -> Option<Stage> {
        let tag = tag.trim();
        Stage::ALL.into_iter().find(|stage| stage.as_str().eq_ignore_ascii_case(tag))
    }

    /// Whether this is the last stage of the journey.
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Snake-case tag used in events, prompts, and progress payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::OrdinaryWorld => "ordinary_world",
            Stage::CallToAdventure => "call_to_adventure",
            Stage::RefusalOfCall => "refusal_of_call",
            Stage::MeetingMentor => "meeting_mentor",
            Stage::CrossingThreshold => "crossing_threshold",
            Stage::TestsAlliesEnemies => "tests_allies_enemies",
            Stage::ApproachOrdeal => "approach_ordeal",
            Stage::Ordeal => "ordeal",
            Stage::Reward => "reward",
            Stage::RoadBack => "road_back",
            Stage::Resurrection => "resurrection",
            Stage::ReturnWithElixir => "return_with_elixir",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::first()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
