//! Stage machine - moves the player through the twelve-stage journey.
//!
//! Progress through a stage is a checklist: each stage has goals, each goal
//! needs a required-action keyword in the player's input plus any facts it
//! depends on. When every goal is done, the journey moves to the next stage.
//!
//! A single call to [`StageMachine::advance`]:
//! 1. **Learn**: fixed trigger words add facts to the player's knowledge
//! 2. **Complete**: incomplete goals whose keywords and knowledge match are ticked off
//! 3. **Prepare**: optional-action keywords teach a goal's required facts
//! 4. **Transition**: with every goal done, the next stage is entered, a major
//!    world event is logged, and the next planned character is introduced

mod defaults;
mod triggers;

pub use defaults::*;
pub use triggers::*;

use journey_rules::{
    goal_progress, Character, CharacterRole, LocationId, PlayerKnowledge, Significance, Stage,
    StageGoal, StoryElements, WorldGraph,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::roster::CharacterRoster;

/// A completed move from one stage to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
    /// Character introduced on entering the new stage.
    pub introduced: Option<String>,
}

impl std::fmt::Display for StageTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entering {}", self.to)
    }
}

/// Story-template details surfaced to narration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementsSummary {
    pub threat: String,
    pub magic: Vec<String>,
    pub prophecy: String,
}

/// Everything narration needs to know about the current stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageContext {
    pub stage: Stage,
    pub tone: String,
    pub focus: String,
    pub narrative_goal: String,
    pub themes: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub active_goals: Vec<String>,
    pub progress: u8,
    pub progress_description: String,
    pub story_elements: Option<ElementsSummary>,
}

/// Debug view of a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDebug {
    pub description: String,
    pub completed: bool,
    pub required_actions: Vec<String>,
    pub required_knowledge: Vec<String>,
}

/// Debug view of the stage machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDebugState {
    pub current_stage: Stage,
    pub stage_progress: u8,
    pub goals: Vec<GoalDebug>,
    pub knowledge: Vec<String>,
}

/// The journey's position, goals, and what the player knows.
#[derive(Debug, Clone)]
pub struct StageMachine {
    current: Stage,
    goals: Vec<StageGoal>,
    knowledge: PlayerKnowledge,
    story_elements: Option<StoryElements>,
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMachine {
    /// Start at the first stage with its built-in goals and no template.
    pub fn new() -> Self {
        Self {
            current: Stage::first(),
            goals: default_goals(Stage::first()),
            knowledge: PlayerKnowledge::new(),
            story_elements: None,
        }
    }

    /// Start at the first stage using a story template. Goals come from the
    /// template's structure for the stage when present, and any locations or
    /// characters it names are registered.
    pub fn initialize(
        elements: &StoryElements,
        world: &mut WorldGraph,
        roster: &mut CharacterRoster,
    ) -> Self {
        let mut machine = Self {
            story_elements: Some(elements.clone()),
            ..Self::new()
        };
        machine.enter_stage(Stage::first(), world, roster);
        machine
    }

    /// Process one player input.
    ///
    /// `morality` is accepted for callers that track it but does not gate
    /// progression.
    pub fn advance(
        &mut self,
        input: &str,
        _morality: i32,
        world: &mut WorldGraph,
        roster: &mut CharacterRoster,
    ) -> Option<StageTransition> {
        let input_lower = input.to_lowercase();

        let learned = learn_from_input(&input_lower, self.story_elements.as_ref(), &mut self.knowledge);
        if !learned.is_empty() {
            debug!(facts = ?learned, "Player learned new facts");
        }

        for goal in self.goals.iter_mut().filter(|g| !g.is_completed()) {
            if goal.matches_required_action(&input_lower) && goal.knowledge_satisfied(&self.knowledge) {
                goal.mark_completed();
                info!(stage = %self.current, goal = goal.description(), "Goal completed");
            }
            if goal.matches_optional_action(&input_lower) {
                for fact in goal.required_knowledge() {
                    self.knowledge.learn(fact.clone());
                }
            }
        }

        if self.goals.is_empty() || !self.goals.iter().all(StageGoal::is_completed) {
            return None;
        }
        self.transition(world, roster)
    }

    fn transition(&mut self, world: &mut WorldGraph, roster: &mut CharacterRoster) -> Option<StageTransition> {
        let from = self.current;
        let to = from.next()?;

        self.enter_stage(to, world, roster);
        let here = world.current_location().clone();
        world.record_event(
            format!("The story moves from {} to {}", from, to),
            here,
            Significance::Major,
            ["Stage transition", "New challenges ahead"],
        );
        let introduced = roster.check_introductions(to);

        info!(from = %from, to = %to, introduced = ?introduced, "Stage transition");
        Some(StageTransition { from, to, introduced })
    }

    fn enter_stage(&mut self, stage: Stage, world: &mut WorldGraph, roster: &mut CharacterRoster) {
        self.current = stage;

        let Some(elements) = self.story_elements.as_ref() else {
            self.goals = default_goals(stage);
            return;
        };

        self.goals = match elements.stage_goals(stage) {
            Some(goals) => goals,
            None => {
                if elements.structure_for(stage).is_some_and(|s| !s.goals.is_empty()) {
                    warn!(stage = %stage, "Template goals can never complete, using built-in goals");
                }
                default_goals(stage)
            }
        };

        let Some(structure) = elements.structure_for(stage) else {
            return;
        };
        let here = world.current_location().clone();
        for name in &structure.locations {
            let id = LocationId::from_name(name);
            world.add_location(
                id.clone(),
                format!("{}, a place bound up with the {} stage", name, stage),
                Vec::<LocationId>::new(),
                Vec::<String>::new(),
            );
            world.connect(here.as_str(), id.as_str());
        }
        for name in &structure.characters {
            let character = Character::new(
                name.clone(),
                CharacterRole::Ally,
                format!("A figure drawn into the story during {}", stage),
                here.clone(),
            );
            roster.add_character(character, stage);
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn goals(&self) -> &[StageGoal] {
        &self.goals
    }

    pub fn knowledge(&self) -> &PlayerKnowledge {
        &self.knowledge
    }

    /// Percentage of the current stage's goals completed; 0 with no goals.
    pub fn stage_progress(&self) -> u8 {
        goal_progress(&self.goals)
    }

    /// A short phrase describing how far the stage has come.
    pub fn progress_description(&self) -> &'static str {
        match self.stage_progress() {
            0..=29 => "The story is just beginning",
            30..=59 => "Events are unfolding",
            60..=89 => "Change is imminent",
            _ => "A turning point approaches",
        }
    }

    /// Context for narration of the current stage.
    pub fn stage_context(&self) -> StageContext {
        let profile = stage_profile(self.current);
        let template_theme = self
            .story_elements
            .as_ref()
            .and_then(|e| e.structure_for(self.current))
            .map(|s| s.theme.trim())
            .filter(|theme| !theme.is_empty());

        let mut themes: Vec<String> = template_theme.map(str::to_string).into_iter().collect();
        themes.extend(profile.themes.iter().map(|t| t.to_string()));
        if self.current == Stage::CallToAdventure {
            if let Some(elements) = &self.story_elements {
                themes.push(elements.ancient_threat.clone());
            }
        }

        let incomplete: Vec<&StageGoal> = self.goals.iter().filter(|g| !g.is_completed()).collect();

        StageContext {
            stage: self.current,
            tone: profile.tone.to_string(),
            focus: profile.focus.to_string(),
            narrative_goal: profile.narrative_goal.to_string(),
            themes,
            suggested_actions: incomplete
                .iter()
                .filter_map(|g| g.first_required_action())
                .map(str::to_string)
                .collect(),
            active_goals: incomplete.iter().map(|g| g.description().to_string()).collect(),
            progress: self.stage_progress(),
            progress_description: self.progress_description().to_string(),
            story_elements: self.story_elements.as_ref().map(|e| ElementsSummary {
                threat: e.ancient_threat.clone(),
                magic: e.magical_elements.clone(),
                prophecy: e.prophecy.clone(),
            }),
        }
    }

    /// Read-only snapshot for debugging.
    pub fn debug_state(&self) -> StageDebugState {
        StageDebugState {
            current_stage: self.current,
            stage_progress: self.stage_progress(),
            goals: self
                .goals
                .iter()
                .map(|g| GoalDebug {
                    description: g.description().to_string(),
                    completed: g.is_completed(),
                    required_actions: g.required_actions().to_vec(),
                    required_knowledge: g.required_knowledge().iter().cloned().collect(),
                })
                .collect(),
            knowledge: self.knowledge.iter().map(str::to_string).collect(),
        }
    }
}
