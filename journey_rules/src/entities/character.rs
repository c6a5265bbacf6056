//! Character definitions.

use serde::{Deserialize, Serialize};

use super::CharacterRole;
use crate::world_state::LocationId;

/// Lowest trust a relationship can fall to.
pub const MIN_TRUST: i32 = -100;
/// Highest trust a relationship can reach.
pub const MAX_TRUST: i32 = 100;

/// Where a relationship currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    #[default]
    Neutral,
    Friendly,
    Allied,
    Wary,
    Hostile,
    Indebted,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Neutral => "neutral",
            RelationshipStatus::Friendly => "friendly",
            RelationshipStatus::Allied => "allied",
            RelationshipStatus::Wary => "wary",
            RelationshipStatus::Hostile => "hostile",
            RelationshipStatus::Indebted => "indebted",
        }
    }
}

impl std::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The player's relationship with a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Relationship {
    trust: i32,
    interactions: Vec<String>,
    status: RelationshipStatus,
    shared_quests: Vec<String>,
}

impl Relationship {
    /// A fresh, zero-trust, neutral relationship.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trust in `[MIN_TRUST, MAX_TRUST]`.
    pub fn trust(&self) -> i32 {
        self.trust
    }

    pub fn interactions(&self) -> &[String] {
        &self.interactions
    }

    /// Up to the last `n` interactions, oldest first.
    pub fn recent_interactions(&self, n: usize) -> &[String] {
        let start = self.interactions.len().saturating_sub(n);
        &self.interactions[start..]
    }

    pub fn status(&self) -> RelationshipStatus {
        self.status
    }

    pub fn shared_quests(&self) -> &[String] {
        &self.shared_quests
    }

    fn adjust_trust(&mut self, delta: i32) {
        self.trust = self.trust.saturating_add(delta).clamp(MIN_TRUST, MAX_TRUST);
    }
}

/// A character in the story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    name: String,
    role: CharacterRole,
    description: String,
    location: LocationId,
    knowledge: Vec<String>,
    inventory: Vec<String>,
    relationship: Relationship,
    last_interaction: Option<String>,
    active: bool,
}

impl Character {
    /// Create an active character with a fresh relationship.
    pub fn new(
        name: impl Into<String>,
        role: CharacterRole,
        description: impl Into<String>,
        location: impl Into<LocationId>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            description: description.into(),
            location: location.into(),
            knowledge: Vec::new(),
            inventory: Vec::new(),
            relationship: Relationship::new(),
            last_interaction: None,
            active: true,
        }
    }

    /// Set what the character knows about.
    pub fn with_knowledge<I, S>(mut self, knowledge: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for fact in knowledge {
            self.learn(fact);
        }
        self
    }

    /// Set what the character carries.
    pub fn with_inventory<I, S>(mut self, inventory: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in inventory {
            let item = item.into();
            if !self.inventory.contains(&item) {
                self.inventory.push(item);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> CharacterRole {
        self.role
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &LocationId {
        &self.location
    }

    pub fn knowledge(&self) -> &[String] {
        &self.knowledge
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn relationship(&self) -> &Relationship {
        &self.relationship
    }

    pub fn last_interaction(&self) -> Option<&str> {
        self.last_interaction.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the character's name appears in the input, ignoring case.
    pub fn is_mentioned_in(&self, input: &str) -> bool {
        input.to_lowercase().contains(&self.name.to_lowercase())
    }

    /// Apply an interaction: trust moves by `trust_delta` (clamped), the
    /// interaction is logged, and the status changes if one is given.
    pub fn record_interaction(
        &mut self,
        trust_delta: i32,
        interaction: impl Into<String>,
        new_status: Option<RelationshipStatus>,
    ) {
        let interaction = interaction.into();
        self.relationship.adjust_trust(trust_delta);
        self.relationship.interactions.push(interaction.clone());
        self.last_interaction = Some(interaction);
        if let Some(status) = new_status {
            self.relationship.status = status;
        }
    }

    /// Add a fact the character knows. Duplicates are ignored.
    pub fn learn(&mut self, fact: impl Into<String>) {
        let fact = fact.into();
        if !self.knowledge.contains(&fact) {
            self.knowledge.push(fact);
        }
    }

    /// Record a quest undertaken together with this character.
    pub fn share_quest(&mut self, quest: impl Into<String>) {
        self.relationship.shared_quests.push(quest.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character() {
        let character = Character::new("Miriam", CharacterRole::Mentor, "Elder Sage", "willowbrook");
        assert_eq!(character.name(), "Miriam");
        assert_eq!(character.location().as_str(), "willowbrook");
        assert_eq!(character.relationship().trust(), 0);
        assert_eq!(character.relationship().status(), RelationshipStatus::Neutral);
        assert!(character.is_active());
        assert!(character.last_interaction().is_none());
    }

    #[test]
    fn test_trust_is_clamped() {
        let mut character = Character::new("Lyra", CharacterRole::Deuteragonist, "A traveler", "marketplace");

        character.record_interaction(80, "Shared bread", None);
        character.record_interaction(80, "Saved her life", Some(RelationshipStatus::Allied));
        assert_eq!(character.relationship().trust(), MAX_TRUST);
        assert_eq!(character.relationship().status(), RelationshipStatus::Allied);

        character.record_interaction(-500, "Betrayed her", Some(RelationshipStatus::Hostile));
        assert_eq!(character.relationship().trust(), MIN_TRUST);

        character.record_interaction(i32::MIN, "Again", None);
        assert_eq!(character.relationship().trust(), MIN_TRUST);
        assert_eq!(character.last_interaction(), Some("Again"));
        assert_eq!(character.relationship().interactions().len(), 4);
    }

    #[test]
    fn test_recent_interactions() {
        let mut character = Character::new("Marcus", CharacterRole::Supporting, "Blacksmith", "village");
        for i in 0..5 {
            character.record_interaction(1, format!("visit {}", i), None);
        }
        assert_eq!(
            character.relationship().recent_interactions(3),
            &["visit 2".to_string(), "visit 3".to_string(), "visit 4".to_string()]
        );
    }

    #[test]
    fn test_mentioned_in_ignores_case() {
        let character = Character::new("Elder Miriam", CharacterRole::Mentor, "", "village");
        assert!(character.is_mentioned_in("I go to see ELDER MIRIAM"));
        assert!(!character.is_mentioned_in("I see miriam"));
    }

    #[test]
    fn test_knowledge_and_inventory_deduplicate() {
        let mut character = Character::new("Miriam", CharacterRole::Mentor, "", "village")
            .with_knowledge(["prophecy", "prophecy"])
            .with_inventory(["Tome", "Tome"]);
        character.learn("runes");
        character.learn("runes");
        assert_eq!(character.knowledge(), &["prophecy".to_string(), "runes".to_string()]);
        assert_eq!(character.inventory().len(), 1);
    }
}
