//! Character roster - who exists, how the player relates to them, and how
//! their arcs develop.

mod introductions;

pub use introductions::*;

use journey_rules::{
    ArcPhase, Character, CharacterArc, CharacterRole, RelationshipStatus, Stage, StoryElements,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Most supporting characters that may be active at once.
pub const MAX_ACTIVE_SUPPORTING: usize = 4;

/// Number of interactions shown per character in story context.
const CONTEXT_INTERACTIONS: usize = 3;
/// Number of knowledge entries shown per character in story context.
const CONTEXT_KNOWLEDGE: usize = 3;

/// Characters, their relationships with the player, and their arcs.
#[derive(Debug, Clone)]
pub struct CharacterRoster {
    characters: HashMap<String, Character>,
    arcs: HashMap<String, CharacterArc>,
    deuteragonist: Option<String>,
    mentor: Option<String>,
    /// Supporting characters in order of arrival.
    supporting: Vec<String>,
    planned_introductions: BTreeMap<Stage, VecDeque<CharacterRole>>,
    registry: IntroductionRegistry,
    story_elements: Option<StoryElements>,
}

impl Default for CharacterRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterRoster {
    /// An empty roster with no planned introductions and no story template.
    pub fn new() -> Self {
        Self {
            characters: HashMap::new(),
            arcs: HashMap::new(),
            deuteragonist: None,
            mentor: None,
            supporting: Vec::new(),
            planned_introductions: BTreeMap::new(),
            registry: IntroductionRegistry::default(),
            story_elements: None,
        }
    }

    /// Seed a roster from a story template: the mentor is present from the
    /// first stage and the default introduction plan is queued.
    pub fn from_story_elements(elements: &StoryElements) -> Self {
        let mut roster = Self::new();
        roster.story_elements = Some(elements.clone());
        roster.planned_introductions = default_introduction_plan();
        if let Some(mentor) = roster.build(CharacterRole::Mentor, Stage::first()) {
            roster.add_character(mentor, Stage::first());
        }
        roster
    }

    /// Replace the planned introductions.
    pub fn with_introduction_plan(mut self, plan: BTreeMap<Stage, VecDeque<CharacterRole>>) -> Self {
        self.planned_introductions = plan;
        self
    }

    /// Replace the role constructors.
    pub fn with_registry(mut self, registry: IntroductionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a character with a fresh arc starting at `stage`.
    ///
    /// Returns `false` without changing anything if the name is already taken
    /// or if the character is supporting and the supporting cast is full.
    pub fn add_character(&mut self, character: Character, stage: Stage) -> bool {
        let name = character.name().to_string();
        if self.characters.contains_key(&name) {
            debug!(name = %name, "Character already on the roster");
            return false;
        }
        let role = character.role();
        if role == CharacterRole::Supporting && self.active_supporting_count() >= MAX_ACTIVE_SUPPORTING {
            warn!(name = %name, "Supporting cast is full, character not added");
            return false;
        }

        match role {
            CharacterRole::Deuteragonist => self.deuteragonist = Some(name.clone()),
            CharacterRole::Mentor => self.mentor = Some(name.clone()),
            CharacterRole::Supporting => self.supporting.push(name.clone()),
            _ => {}
        }

        self.arcs.insert(name.clone(), CharacterArc::new(stage));
        self.characters.insert(name.clone(), character);
        info!(name = %name, role = %role, stage = %stage, "Character joined the story");
        true
    }

    /// Adjust trust (clamped to [-100, 100]) and log an interaction. Unknown
    /// names are ignored.
    pub fn update_relationship(
        &mut self,
        name: &str,
        trust_delta: i32,
        interaction: impl Into<String>,
        new_status: Option<RelationshipStatus>,
    ) {
        if let Some(character) = self.characters.get_mut(name) {
            character.record_interaction(trust_delta, interaction, new_status);
        }
    }

    /// Record a quest shared with a character. Unknown names are ignored.
    pub fn add_shared_quest(&mut self, name: &str, quest: impl Into<String>) {
        if let Some(character) = self.characters.get_mut(name) {
            character.share_quest(quest);
        }
    }

    /// Teach a character a new fact. Unknown names are ignored.
    pub fn update_character_knowledge(&mut self, name: &str, fact: impl Into<String>) {
        if let Some(character) = self.characters.get_mut(name) {
            character.learn(fact);
        }
    }

    /// Advance the arc of every character named in the input.
    ///
    /// Returns the characters whose arcs moved to a new phase, sorted by name.
    pub fn advance_character_arcs(&mut self, stage: Stage, input: &str) -> Vec<(String, ArcPhase)> {
        let input_lower = input.to_lowercase();
        let mut advanced = Vec::new();

        for (name, arc) in self.arcs.iter_mut() {
            if !input_lower.contains(&name.to_lowercase()) {
                continue;
            }
            if let Some(phase) = arc.step() {
                debug!(name = %name, phase = %phase, stage = %stage, "Character arc advanced");
                advanced.push((name.clone(), phase));
            }
        }

        advanced.sort();
        advanced
    }

    /// Introduce the next planned character for `stage`, if any.
    ///
    /// Each call consumes one planned role; a consumed role is never planned
    /// again. Returns the name of the character that joined.
    pub fn check_introductions(&mut self, stage: Stage) -> Option<String> {
        let role = self.planned_introductions.get_mut(&stage)?.pop_front()?;
        let Some(character) = self.build(role, stage) else {
            warn!(role = %role, stage = %stage, "No character available for planned introduction");
            return None;
        };
        let name = character.name().to_string();
        self.add_character(character, stage).then_some(name)
    }

    fn build(&self, role: CharacterRole, stage: Stage) -> Option<Character> {
        let context = IntroductionContext {
            stage,
            elements: self.story_elements.as_ref(),
            taken: self.characters.keys().map(String::as_str).collect(),
        };
        self.registry.build(role, &context)
    }

    /// Active characters at a location, sorted by name.
    pub fn relevant_characters(&self, location: &str) -> Vec<&Character> {
        let mut present: Vec<&Character> = self
            .characters
            .values()
            .filter(|c| c.is_active() && c.location().as_str() == location)
            .collect();
        present.sort_by(|a, b| a.name().cmp(b.name()));
        present
    }

    /// Narrative context block for one character.
    pub fn character_context(&self, name: &str) -> Option<String> {
        let character = self.characters.get(name)?;
        let arc = self.arcs.get(name)?;
        let relationship = character.relationship();
        let knowledge: Vec<&str> = character
            .knowledge()
            .iter()
            .take(CONTEXT_KNOWLEDGE)
            .map(String::as_str)
            .collect();

        Some(format!(
            "Character: {}\n\
             Role: {}\n\
             Description: {}\n\
             Current Arc: {} (Progress: {}%)\n\
             Location: {}\n\
             Relationship: {} (Trust: {})\n\
             Recent interactions: {}\n\
             Key knowledge: {}\n\
             Recent development: {}\n",
            character.name(),
            character.role(),
            character.description(),
            arc.phase(),
            arc.progress(),
            character.location(),
            relationship.status(),
            relationship.trust(),
            relationship.recent_interactions(CONTEXT_INTERACTIONS).join(", "),
            knowledge.join(", "),
            arc.latest_development().unwrap_or("None"),
        ))
    }

    /// Context for narration: the deuteragonist, then the mentor, then every
    /// supporting character in order of arrival.
    pub fn story_context(&self) -> String {
        let mut parts = Vec::new();

        if let Some(block) = self.deuteragonist.as_deref().and_then(|n| self.character_context(n)) {
            parts.push(format!("Second Main Character: {}", block));
        }
        if let Some(block) = self.mentor.as_deref().and_then(|n| self.character_context(n)) {
            parts.push(format!("Active Mentor: {}", block));
        }
        if !self.supporting.is_empty() {
            let blocks: Vec<String> = self
                .supporting
                .iter()
                .filter_map(|n| self.character_context(n))
                .collect();
            parts.push(format!("\nSupporting Characters:\n{}", blocks.join("\n")));
        }

        parts.join("\n")
    }

    pub fn get_character(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn get_arc(&self, name: &str) -> Option<&CharacterArc> {
        self.arcs.get(name)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn deuteragonist(&self) -> Option<&str> {
        self.deuteragonist.as_deref()
    }

    pub fn mentor(&self) -> Option<&str> {
        self.mentor.as_deref()
    }

    /// Number of active characters carrying the supporting role.
    pub fn active_supporting_count(&self) -> usize {
        self.characters
            .values()
            .filter(|c| c.role() == CharacterRole::Supporting && c.is_active())
            .count()
    }

    /// Roles still waiting to be introduced at `stage`.
    pub fn planned_for(&self, stage: Stage) -> Vec<CharacterRole> {
        self.planned_introductions
            .get(&stage)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Read-only snapshot for debugging.
    pub fn debug_state(&self) -> RosterDebugState {
        let mut characters: Vec<CharacterDebug> = self
            .characters
            .values()
            .map(|c| {
                let arc = self.arcs.get(c.name());
                CharacterDebug {
                    name: c.name().to_string(),
                    role: c.role(),
                    location: c.location().to_string(),
                    is_active: c.is_active(),
                    trust: c.relationship().trust(),
                    status: c.relationship().status(),
                    arc_phase: arc.map(CharacterArc::phase).unwrap_or_default(),
                    arc_progress: arc.map(CharacterArc::progress).unwrap_or_default(),
                    developments: arc
                        .map(|a| a.development_points().to_vec())
                        .unwrap_or_default(),
                }
            })
            .collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));

        RosterDebugState {
            characters,
            deuteragonist: self.deuteragonist.clone(),
            mentor: self.mentor.clone(),
            supporting: self.supporting.clone(),
            planned_introductions: self
                .planned_introductions
                .iter()
                .map(|(stage, roles)| (*stage, roles.iter().copied().collect()))
                .collect(),
        }
    }
}

/// Debug view of a single character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDebug {
    pub name: String,
    pub role: CharacterRole,
    pub location: String,
    pub is_active: bool,
    pub trust: i32,
    pub status: RelationshipStatus,
    pub arc_phase: ArcPhase,
    pub arc_progress: u8,
    pub developments: Vec<String>,
}

/// Debug view of the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDebugState {
    pub characters: Vec<CharacterDebug>,
    pub deuteragonist: Option<String>,
    pub mentor: Option<String>,
    pub supporting: Vec<String>,
    pub planned_introductions: BTreeMap<Stage, Vec<CharacterRole>>,
}
