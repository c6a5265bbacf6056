//! Context Assembler - Builds the narration context for a single turn.
//!
//! Assembly gathers, in order:
//! 1. **Stage**: tone, themes, narrative goal, suggested actions
//! 2. **Focus**: what this turn's narration should emphasise, from the last action
//! 3. **World**: the current location's context
//! 4. **Characters**: the roster's story context
//! 5. **History**: recent beats, previously offered choices, and discoveries
//!
//! The result renders to a prompt whose last line asks for the
//! `"You can:"` choice format that responses are validated against.

use journey_rules::{LocationId, Stage, WorldGraph};
use serde::{Deserialize, Serialize};

use crate::discoveries::DiscoveredElements;
use crate::narration::CHOICE_MARKER;
use crate::roster::CharacterRoster;
use crate::stage_machine::StageMachine;

/// Focus when an action first mentions the letter.
pub const FOCUS_LETTER: &str = "Reveal the initial mystery and its implications";
/// Focus when an action involves the mentor.
pub const FOCUS_MENTOR: &str = "Develop mentor relationship and expand story knowledge";
/// Focus when an action heads into the forest.
pub const FOCUS_FOREST: &str = "Build tension and reveal supernatural elements";

/// One recorded player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryBeat {
    /// The action, lower-cased.
    pub action: String,
    pub stage: Stage,
    pub location: LocationId,
    pub characters_present: Vec<String>,
}

/// Choices offered by a narration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferedChoices {
    /// The narration that preceded the choices.
    pub context: String,
    pub options: Vec<String>,
    pub stage: Stage,
}

/// How much history goes into a single context.
#[derive(Debug, Clone)]
pub struct ContextLimits {
    /// Most recent beats included.
    pub recent_beats: usize,
    /// Most recent choice sets included.
    pub recent_choices: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            recent_beats: 3,
            recent_choices: 2,
        }
    }
}

/// Everything a session owns that feeds narration.
pub struct ContextSources<'a> {
    pub stages: &'a StageMachine,
    pub world: &'a WorldGraph,
    pub roster: &'a CharacterRoster,
    /// Beats oldest first; the last one is the current action.
    pub beats: &'a [StoryBeat],
    pub choices: &'a [OfferedChoices],
    pub discoveries: &'a DiscoveredElements,
}

/// The context assembler builds narration context from session state.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    limits: ContextLimits,
}

impl ContextAssembler {
    pub fn new(limits: ContextLimits) -> Self {
        Self { limits }
    }

    /// Create a context assembler with default limits.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Assemble the context for narrating a response to `player_input`.
    pub fn assemble_context(&self, player_input: &str, sources: &ContextSources<'_>) -> NarrationContext {
        let stage = sources.stages.stage_context();

        NarrationContext {
            stage: stage.stage,
            narrative_goal: stage.narrative_goal.clone(),
            narrative_focus: self.narrative_focus(sources, &stage.focus),
            tone: stage.tone,
            themes: stage.themes,
            suggested_actions: stage.suggested_actions,
            active_goals: stage.active_goals,
            progress_description: stage.progress_description,
            location_context: sources
                .world
                .location_context(None)
                .map(|context| context.to_string())
                .unwrap_or_default(),
            character_context: sources.roster.story_context(),
            recent_actions: tail(sources.beats, self.limits.recent_beats)
                .iter()
                .map(|beat| beat.action.clone())
                .collect(),
            previous_choices: tail(sources.choices, self.limits.recent_choices)
                .iter()
                .map(|choice| choice.options.join(" or "))
                .collect(),
            discoveries: sources.discoveries.summaries(),
            player_input: player_input.to_string(),
        }
    }

    /// Focus for this turn. The letter only drives focus the first time it
    /// comes up.
    fn narrative_focus(&self, sources: &ContextSources<'_>, stage_focus: &str) -> String {
        let Some((last, earlier)) = sources.beats.split_last() else {
            return stage_focus.to_string();
        };
        let action = last.action.as_str();

        if action.contains("letter") && !earlier.iter().any(|beat| beat.action.contains("letter")) {
            return FOCUS_LETTER.to_string();
        }
        let mentor_mentioned = action.contains("elder")
            || sources
                .roster
                .mentor()
                .and_then(|name| sources.roster.get_character(name))
                .is_some_and(|mentor| mentor.is_mentioned_in(action));
        if mentor_mentioned {
            return FOCUS_MENTOR.to_string();
        }
        if action.contains("forest") {
            return FOCUS_FOREST.to_string();
        }
        stage_focus.to_string()
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// The assembled context ready for prompt generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationContext {
    pub stage: Stage,
    pub narrative_goal: String,
    pub narrative_focus: String,
    pub tone: String,
    pub themes: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub active_goals: Vec<String>,
    pub progress_description: String,
    /// Rendered context of the current location.
    pub location_context: String,
    /// Rendered roster context.
    pub character_context: String,
    pub recent_actions: Vec<String>,
    pub previous_choices: Vec<String>,
    pub discoveries: Vec<String>,
    pub player_input: String,
}

impl NarrationContext {
    /// Format the context as a prompt string.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("System: You are a fantasy RPG Dungeon Master guiding a hero's journey.\n\n");
        prompt.push_str(&format!("Current stage: {}\n", self.stage));
        prompt.push_str(&format!("Story goal: {}\n", self.narrative_goal));
        prompt.push_str(&format!("Narrative focus: {}\n", self.narrative_focus));
        prompt.push_str(&format!("Stage progress: {}\n\n", self.progress_description));

        prompt.push_str("Player's journey so far:\n");
        prompt.push_str(&format!("- Discovered elements: {}\n", self.discoveries.join(", ")));
        prompt.push_str(&format!("- Recent actions: {}\n", self.recent_actions.join(", ")));
        prompt.push_str(&format!("- Previous choices: {}\n\n", self.previous_choices.join(", ")));

        prompt.push_str("World Context:\n");
        prompt.push_str(&self.location_context);
        prompt.push_str("\n\n");

        if !self.character_context.is_empty() {
            prompt.push_str("Character Context:\n");
            prompt.push_str(&self.character_context);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("Story tone: {}\n", self.tone));
        prompt.push_str(&format!("Key themes: {}\n", self.themes.join(", ")));
        if !self.active_goals.is_empty() {
            prompt.push_str(&format!("Open goals: {}\n", self.active_goals.join("; ")));
        }
        if !self.suggested_actions.is_empty() {
            prompt.push_str(&format!("Suggested actions: {}\n", self.suggested_actions.join(", ")));
        }
        prompt.push('\n');

        prompt.push_str("IMPORTANT: Create a response that:\n");
        prompt.push_str(&format!("1. Reacts naturally to the player's action: \"{}\"\n", self.player_input));
        prompt.push_str("2. Builds on their discoveries and choices\n");
        prompt.push_str("3. Advances the story while maintaining player agency\n");
        prompt.push_str("4. Offers meaningful choices that reflect current context\n\n");
        prompt.push_str(&format!(
            "Format: [Vivid description of what happens]. [Key revelation or discovery]. \
             {} [Choice that builds on player's path] or [Alternative meaningful choice]\n\n",
            CHOICE_MARKER
        ));
        prompt.push_str("Response:");

        prompt
    }
}
