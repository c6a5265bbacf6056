//! Discovered elements - what the player has explored, met, found, or learned.
//!
//! Discoveries are tagged the same way throughout the engine:
//! `location:X`, `character:X`, `item:X`, `knowledge:X`.

use journey_rules::Character;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single discovered element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiscoveryTag {
    /// A location the player explored.
    Location(String),

    /// A character the player addressed by name.
    Character(String),

    /// An item the player came across.
    Item(String),

    /// Something the player learned about.
    Knowledge(String),
}

impl DiscoveryTag {
    pub fn location(name: impl Into<String>) -> Self {
        DiscoveryTag::Location(name.into())
    }

    pub fn character(name: impl Into<String>) -> Self {
        DiscoveryTag::Character(name.into())
    }

    pub fn item(name: impl Into<String>) -> Self {
        DiscoveryTag::Item(name.into())
    }

    pub fn knowledge(name: impl Into<String>) -> Self {
        DiscoveryTag::Knowledge(name.into())
    }

    /// The tag's string form, e.g. `"item:mysterious_letter"`.
    pub fn as_string(&self) -> String {
        match self {
            DiscoveryTag::Location(s) => format!("location:{}", s),
            DiscoveryTag::Character(s) => format!("character:{}", s),
            DiscoveryTag::Item(s) => format!("item:{}", s),
            DiscoveryTag::Knowledge(s) => format!("knowledge:{}", s),
        }
    }

    /// A short phrase for narration, e.g. `"Found mysterious letter"`.
    pub fn summary(&self) -> String {
        match self {
            DiscoveryTag::Location(s) => format!("Explored {}", s),
            DiscoveryTag::Character(s) => format!("Met {}", s),
            DiscoveryTag::Item(s) => format!("Found {}", s.replace('_', " ")),
            DiscoveryTag::Knowledge(s) => format!("Learned about {}", s.replace('_', " ")),
        }
    }
}

impl std::fmt::Display for DiscoveryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// The growing set of discoveries for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredElements {
    tags: BTreeSet<DiscoveryTag>,
}

impl DiscoveredElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Returns `true` if it was not already discovered.
    pub fn insert(&mut self, tag: DiscoveryTag) -> bool {
        self.tags.insert(tag)
    }

    /// Apply the discovery rules to one player input.
    ///
    /// `present` are the characters at the player's location; only they can be
    /// met. Returns the tags discovered for the first time.
    pub fn update(&mut self, input: &str, location: &str, present: &[&Character]) -> Vec<DiscoveryTag> {
        let input_lower = input.to_lowercase();
        let mut found = Vec::new();

        if input_lower.contains("explore") || input_lower.contains("investigate") {
            found.push(DiscoveryTag::location(location));
        }
        for character in present {
            if character.is_mentioned_in(&input_lower) {
                found.push(DiscoveryTag::character(character.name()));
            }
        }
        if input_lower.contains("letter") {
            found.push(DiscoveryTag::item("mysterious_letter"));
        }
        if input_lower.contains("runes") || input_lower.contains("symbols") {
            found.push(DiscoveryTag::knowledge("ancient_runes"));
        }

        found.retain(|tag| self.tags.insert(tag.clone()));
        found
    }

    pub fn contains(&self, tag: &DiscoveryTag) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryTag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags in string form, sorted.
    pub fn tags(&self) -> Vec<String> {
        self.tags.iter().map(DiscoveryTag::as_string).collect()
    }

    /// Narration phrases for every discovery, sorted by tag.
    pub fn summaries(&self) -> Vec<String> {
        self.tags.iter().map(DiscoveryTag::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journey_rules::CharacterRole;

    #[test]
    fn test_tag_strings() {
        assert_eq!(DiscoveryTag::item("mysterious_letter").as_string(), "item:mysterious_letter");
        assert_eq!(DiscoveryTag::location("forest_edge").to_string(), "location:forest_edge");
        assert_eq!(DiscoveryTag::item("mysterious_letter").summary(), "Found mysterious letter");
        assert_eq!(DiscoveryTag::knowledge("ancient_runes").summary(), "Learned about ancient runes");
        assert_eq!(DiscoveryTag::character("Miriam").summary(), "Met Miriam");
        assert_eq!(DiscoveryTag::location("forest_edge").summary(), "Explored forest_edge");
    }

    #[test]
    fn test_update_rules() {
        let miriam = Character::new("Miriam", CharacterRole::Mentor, "Elder Sage", "willowbrook");
        let mut discovered = DiscoveredElements::new();

        let found = discovered.update("Investigate the letter with MIRIAM", "willowbrook", &[&miriam]);
        assert_eq!(
            found,
            vec![
                DiscoveryTag::location("willowbrook"),
                DiscoveryTag::character("Miriam"),
                DiscoveryTag::item("mysterious_letter"),
            ]
        );

        let found = discovered.update("study the strange symbols on the letter", "willowbrook", &[]);
        assert_eq!(found, vec![DiscoveryTag::knowledge("ancient_runes")]);
        assert_eq!(discovered.len(), 4);
    }

    #[test]
    fn test_absent_characters_are_not_met() {
        let mut discovered = DiscoveredElements::new();
        assert!(discovered.update("call for Lyra", "village", &[]).is_empty());
        assert!(discovered.is_empty());
    }

    #[test]
    fn test_summaries_are_sorted() {
        let mut discovered = DiscoveredElements::new();
        discovered.insert(DiscoveryTag::knowledge("ancient_runes"));
        discovered.insert(DiscoveryTag::location("village"));
        assert_eq!(discovered.tags(), vec!["location:village", "knowledge:ancient_runes"]);
        assert_eq!(
            discovered.summaries(),
            vec!["Explored village".to_string(), "Learned about ancient runes".to_string()]
        );
    }
}
