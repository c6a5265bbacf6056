//! Session orchestrator - one player's game.
//!
//! A [`Session`] owns everything that changes during play: the world, the
//! roster, the stage machine, the rolling history, discoveries, and the
//! morality counter. Nothing is shared between sessions; [`SessionStore`]
//! keeps them apart by id.
//!
//! A turn through [`Session::respond`]:
//! 1. **Command**: `"start game"` starts over
//! 2. **Morality**: good and bad keywords shift the counter by one each
//! 3. **Truncate**: input is cut to the configured word cap
//! 4. **Advance**: the stage machine and character arcs react to the input
//! 5. **Record**: a story beat is stored and discoveries are updated
//! 6. **Narrate**: context is assembled and sent to the narrator, with a
//!    deterministic fallback whenever narration is missing or unusable

mod store;

pub use store::*;

use journey_rules::{Significance, Stage, StoryElements, WorldDebugState, WorldGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::context_assembler::{ContextAssembler, ContextSources, OfferedChoices, StoryBeat};
use crate::discoveries::DiscoveredElements;
use crate::narration::{
    is_valid_narration, opening_prompt, parse_choices, GenerationOptions, Narrator,
    StoryElementsGenerator,
};
use crate::roster::{CharacterRoster, RosterDebugState};
use crate::stage_machine::{StageDebugState, StageMachine};

/// Opening narration used when no narrator is available.
pub const DEFAULT_OPENING: &str = "As dawn breaks over your peaceful village, a mysterious letter \
     arrives bearing unfamiliar markings. You can: read the letter or continue your daily routine";

/// Fallback narration after an action involving the letter.
pub const LETTER_FALLBACK: &str = "The mysterious letter reveals troubling news about dark forces \
     stirring. Ancient warnings must not be ignored. You can: seek Elder Miriam's counsel or \
     investigate the forest's edge";

/// The command that starts a new game.
pub const START_COMMAND: &str = "start game";

/// Bounds of the morality counter.
pub const MORALITY_RANGE: (i32, i32) = (-5, 5);

const GOOD_KEYWORDS: &[&str] = &["help", "protect", "save", "heal", "share", "give", "comfort", "defend"];
const BAD_KEYWORDS: &[&str] = &["steal", "kill", "betray", "lie", "threaten", "abandon", "destroy", "harm"];

/// Unique identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Progress reported with every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryProgress {
    pub stage: Stage,
    pub percentage: u8,
    /// Discovered-element tags, e.g. `"item:mysterious_letter"`.
    pub discoveries: Vec<String>,
    /// Actions open to the player: the offered choices, or the stage's
    /// suggested actions when none were offered.
    pub actions: Vec<String>,
}

/// What a caller receives for each turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    pub response: String,
    pub progress: StoryProgress,
    /// Present only when starting a game with debug output enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugSnapshot>,
}

/// Read-only view of a whole session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugSnapshot {
    pub session: SessionId,
    pub world: WorldDebugState,
    pub characters: RosterDebugState,
    pub journey: StageDebugState,
    pub story_elements: StoryElements,
    pub morality: i32,
    pub discoveries: Vec<String>,
    pub recent_beats: Vec<StoryBeat>,
}

/// One player's game.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    config: EngineConfig,
    narrator: Option<Narrator>,
    assembler: ContextAssembler,
    story_elements: StoryElements,
    world: WorldGraph,
    roster: CharacterRoster,
    stages: StageMachine,
    beats: Vec<StoryBeat>,
    choices: Vec<OfferedChoices>,
    discoveries: DiscoveredElements,
    morality: i32,
    last_action: String,
}

impl Session {
    /// A session seeded from the canonical template. Call
    /// [`Session::start_new_game`] to generate a fresh story.
    pub fn new(config: EngineConfig, narrator: Option<Narrator>) -> Self {
        let mut session = Self {
            id: SessionId::new(),
            config,
            narrator,
            assembler: ContextAssembler::with_defaults(),
            story_elements: StoryElements::canonical(),
            world: WorldGraph::new(),
            roster: CharacterRoster::new(),
            stages: StageMachine::new(),
            beats: Vec::new(),
            choices: Vec::new(),
            discoveries: DiscoveredElements::new(),
            morality: 0,
            last_action: String::new(),
        };
        session.reset(StoryElements::canonical());
        session
    }

    /// Discard all state and seed everything from `elements`.
    fn reset(&mut self, elements: StoryElements) {
        let mut world = WorldGraph::from_story_elements(&elements);
        let mut roster = CharacterRoster::from_story_elements(&elements);
        self.stages = StageMachine::initialize(&elements, &mut world, &mut roster);
        self.world = world;
        self.roster = roster;
        self.story_elements = elements;
        self.beats.clear();
        self.choices.clear();
        self.discoveries = DiscoveredElements::new();
        self.morality = 0;
        self.last_action.clear();
    }

    /// Start over with a newly generated story and return the opening.
    pub async fn start_new_game(&mut self) -> StoryResponse {
        let generator = StoryElementsGenerator::new(
            self.narrator.clone(),
            GenerationOptions::story_elements(&self.config.narration),
        );
        let elements = generator.generate().await;
        self.reset(elements);

        let opening = self.opening_narration().await;
        let here = self.world.current_location().clone();
        self.world.record_event(
            "Story begins",
            here,
            Significance::Major,
            ["Game start", "Peaceful beginning", "Mystery appears"],
        );
        info!(session = %self.id, village = %self.story_elements.village_name, "New game started");

        StoryResponse {
            progress: self.progress(&opening),
            response: opening,
            debug: self.debug_snapshot(),
        }
    }

    async fn opening_narration(&self) -> String {
        let Some(narrator) = &self.narrator else {
            return DEFAULT_OPENING.to_string();
        };
        let prompt = opening_prompt(&self.story_elements.village_name);
        match narrator
            .generate(&prompt, &GenerationOptions::opening(&self.config.narration))
            .await
        {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!(session = %self.id, "Empty opening narration, using default");
                DEFAULT_OPENING.to_string()
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "Opening narration failed, using default");
                DEFAULT_OPENING.to_string()
            }
        }
    }

    /// Play one turn.
    pub async fn respond(&mut self, player_input: &str) -> StoryResponse {
        if player_input.trim().eq_ignore_ascii_case(START_COMMAND) {
            return self.start_new_game().await;
        }

        self.morality = (self.morality + morality_shift(player_input))
            .clamp(MORALITY_RANGE.0, MORALITY_RANGE.1);
        let input = truncate_words(player_input, self.config.session.max_input_words);

        if let Some(transition) = self
            .stages
            .advance(&input, self.morality, &mut self.world, &mut self.roster)
        {
            info!(session = %self.id, %transition, "Journey advanced");
        }
        let stage = self.stages.current_stage();
        for (name, phase) in self.roster.advance_character_arcs(stage, &input) {
            debug!(session = %self.id, name = %name, phase = %phase, "Character arc moved on");
        }

        self.record_beat(&input);
        let here = self.world.current_location().clone();
        let present = self.roster.relevant_characters(here.as_str());
        let found = self.discoveries.update(&input, here.as_str(), &present);
        if !found.is_empty() {
            debug!(session = %self.id, discoveries = ?found, "New discoveries");
        }

        let response = match self.narrate(&input).await {
            Some(text) => text,
            None => self.fallback_narration(),
        };

        StoryResponse {
            progress: self.progress(&response),
            response,
            debug: None,
        }
    }

    fn record_beat(&mut self, input: &str) {
        let here = self.world.current_location().clone();
        let characters_present = self
            .roster
            .relevant_characters(here.as_str())
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        self.last_action = input.to_lowercase();
        self.beats.push(StoryBeat {
            action: self.last_action.clone(),
            stage: self.stages.current_stage(),
            location: here,
            characters_present,
        });
        trim_front(&mut self.beats, self.config.session.history_limit);
    }

    /// Narrate the turn, or `None` if there is no narrator or the reply is
    /// unusable.
    async fn narrate(&mut self, input: &str) -> Option<String> {
        let narrator = self.narrator.as_ref()?;

        let sources = ContextSources {
            stages: &self.stages,
            world: &self.world,
            roster: &self.roster,
            beats: &self.beats,
            choices: &self.choices,
            discoveries: &self.discoveries,
        };
        let prompt = self.assembler.assemble_context(input, &sources).to_prompt_string();

        let text = match narrator
            .generate(&prompt, &GenerationOptions::story(&self.config.narration))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(session = %self.id, error = %err, "Narration failed, using fallback");
                return None;
            }
        };
        if !is_valid_narration(&text) {
            warn!(session = %self.id, "Narration offered no choices, using fallback");
            return None;
        }

        if let Some((context, options)) = parse_choices(&text) {
            self.choices.push(OfferedChoices {
                context,
                options,
                stage: self.stages.current_stage(),
            });
            trim_front(&mut self.choices, self.config.session.choice_history_limit);
        }
        Some(text)
    }

    /// Deterministic narration for when the narrator cannot be used.
    pub fn fallback_narration(&self) -> String {
        if self.last_action.contains("letter") {
            return LETTER_FALLBACK.to_string();
        }
        format!(
            "You stand in {}, sensing the weight of destiny. The {} phase of your journey \
             continues. You can: investigate your surroundings or seek guidance",
            self.world.current_location(),
            self.stages.current_stage()
        )
    }

    fn progress(&self, response: &str) -> StoryProgress {
        let actions = match parse_choices(response) {
            Some((_, options)) if !options.is_empty() => options,
            _ => self.stages.stage_context().suggested_actions,
        };
        StoryProgress {
            stage: self.stages.current_stage(),
            percentage: self.stages.stage_progress(),
            discoveries: self.discoveries.tags(),
            actions,
        }
    }

    /// Full snapshot, or `None` when debug output is disabled.
    pub fn debug_snapshot(&self) -> Option<DebugSnapshot> {
        if !self.config.session.expose_debug {
            return None;
        }
        Some(DebugSnapshot {
            session: self.id,
            world: self.world.debug_state(),
            characters: self.roster.debug_state(),
            journey: self.stages.debug_state(),
            story_elements: self.story_elements.clone(),
            morality: self.morality,
            discoveries: self.discoveries.tags(),
            recent_beats: self.beats.clone(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_stage(&self) -> Stage {
        self.stages.current_stage()
    }

    pub fn stage_progress(&self) -> u8 {
        self.stages.stage_progress()
    }

    pub fn world(&self) -> &WorldGraph {
        &self.world
    }

    pub fn roster(&self) -> &CharacterRoster {
        &self.roster
    }

    pub fn stages(&self) -> &StageMachine {
        &self.stages
    }

    pub fn discoveries(&self) -> &DiscoveredElements {
        &self.discoveries
    }

    pub fn story_elements(&self) -> &StoryElements {
        &self.story_elements
    }

    /// Recorded beats, oldest first.
    pub fn beats(&self) -> &[StoryBeat] {
        &self.beats
    }

    /// Offered-choice records, oldest first.
    pub fn choices(&self) -> &[OfferedChoices] {
        &self.choices
    }

    pub fn morality(&self) -> i32 {
        self.morality
    }
}

/// +1 if any word starts with a good keyword, -1 if any starts with a bad
/// one. "killed" and "helping" count; "believe" is not "lie".
fn morality_shift(input: &str) -> i32 {
    let input_lower = input.to_lowercase();
    let words: Vec<&str> = input_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let any = |keywords: &[&str]| words.iter().any(|w| keywords.iter().any(|k| w.starts_with(*k)));

    let mut shift = 0;
    if any(GOOD_KEYWORDS) {
        shift += 1;
    }
    if any(BAD_KEYWORDS) {
        shift -= 1;
    }
    shift
}

fn truncate_words(input: &str, max_words: usize) -> String {
    input.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ")
}

fn trim_front<T>(items: &mut Vec<T>, limit: usize) {
    if items.len() > limit {
        let excess = items.len() - limit;
        items.drain(..excess);
    }
}
