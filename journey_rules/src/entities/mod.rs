//! Character definitions for the story.

mod arc;
mod character;

pub use arc::*;
pub use character::*;

use serde::{Deserialize, Serialize};

/// The narrative role a character plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterRole {
    Protagonist,
    Deuteragonist,
    Mentor,
    Ally,
    Enemy,
    Supporting,
}

impl CharacterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterRole::Protagonist => "protagonist",
            CharacterRole::Deuteragonist => "deuteragonist",
            CharacterRole::Mentor => "mentor",
            CharacterRole::Ally => "ally",
            CharacterRole::Enemy => "enemy",
            CharacterRole::Supporting => "supporting",
        }
    }
}

impl std::fmt::Display for CharacterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
