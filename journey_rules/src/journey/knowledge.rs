//! Player knowledge - an ever-growing set of fact tokens.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const LETTER_EXISTS: &str = "letter exists";
pub const DARK_WARNING: &str = "dark warning";
pub const MENTOR_GUIDANCE: &str = "mentor guidance";
pub const QUEST_IMPORTANCE: &str = "quest importance";

/// Facts the keyword triggers teach whatever story template is loaded.
pub const FIXED_TRIGGER_FACTS: [&str; 4] = [LETTER_EXISTS, DARK_WARNING, MENTOR_GUIDANCE, QUEST_IMPORTANCE];

/// Facts the player has learned. Facts are never forgotten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerKnowledge {
    facts: BTreeSet<String>,
}

impl PlayerKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn a fact. Returns `true` if it was new.
    pub fn learn(&mut self, fact: impl Into<String>) -> bool {
        self.facts.insert(fact.into())
    }

    pub fn knows(&self, fact: &str) -> bool {
        self.facts.contains(fact)
    }

    /// Whether every fact in `required` is known.
    pub fn contains_all(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.facts)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learn_is_idempotent() {
        let mut knowledge = PlayerKnowledge::new();
        assert!(knowledge.learn("letter exists"));
        assert!(!knowledge.learn("letter exists"));
        assert_eq!(knowledge.len(), 1);
        assert!(knowledge.knows("letter exists"));
    }

    #[test]
    fn test_contains_all() {
        let mut knowledge = PlayerKnowledge::new();
        knowledge.learn("a");
        knowledge.learn("b");

        let required: BTreeSet<String> = ["a".to_string()].into_iter().collect();
        assert!(knowledge.contains_all(&required));
        assert!(knowledge.contains_all(&BTreeSet::new()));

        let missing: BTreeSet<String> = ["c".to_string()].into_iter().collect();
        assert!(!knowledge.contains_all(&missing));
    }
}
