//! Stage goals - the checklist that gates progression through a stage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::PlayerKnowledge;

/// A unit of required/optional action plus knowledge gating.
///
/// Goals are matched by keyword: a required action counts when its keyword
/// appears anywhere in the (lower-cased) player input. Once completed, a goal
/// stays completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageGoal {
    description: String,
    required_actions: Vec<String>,
    optional_actions: Vec<String>,
    required_knowledge: BTreeSet<String>,
    completed: bool,
}

impl StageGoal {
    /// Create an incomplete goal with no keywords.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            required_actions: Vec::new(),
            optional_actions: Vec::new(),
            required_knowledge: BTreeSet::new(),
            completed: false,
        }
    }

    /// Set the keywords of which at least one must appear to complete the goal.
    pub fn with_required_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_actions = actions.into_iter().map(|a| a.into().to_lowercase()).collect();
        self
    }

    /// Set the keywords that teach goal-relevant knowledge without completing it.
    pub fn with_optional_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional_actions = actions.into_iter().map(|a| a.into().to_lowercase()).collect();
        self
    }

    /// Set the facts the player must know before the goal can complete.
    pub fn with_required_knowledge<I, S>(mut self, knowledge: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_knowledge = knowledge.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required_actions(&self) -> &[String] {
        &self.required_actions
    }

    pub fn optional_actions(&self) -> &[String] {
        &self.optional_actions
    }

    pub fn required_knowledge(&self) -> &BTreeSet<String> {
        &self.required_knowledge
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether any required-action keyword appears in the input.
    pub fn matches_required_action(&self, input_lower: &str) -> bool {
        self.required_actions
            .iter()
            .any(|action| input_lower.contains(action.as_str()))
    }

    /// Whether any optional-action keyword appears in the input.
    pub fn matches_optional_action(&self, input_lower: &str) -> bool {
        self.optional_actions
            .iter()
            .any(|action| input_lower.contains(action.as_str()))
    }

    /// Whether every required fact is already known.
    pub fn knowledge_satisfied(&self, knowledge: &PlayerKnowledge) -> bool {
        knowledge.contains_all(&self.required_knowledge)
    }

    /// The first required-action keyword, used as a suggested action.
    pub fn first_required_action(&self) -> Option<&str> {
        self.required_actions.first().map(String::as_str)
    }

    /// Mark the goal completed. Completion is permanent.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// Percentage of completed goals, `0` when there are none.
pub fn goal_progress(goals: &[StageGoal]) -> u8 {
    if goals.is_empty() {
        return 0;
    }
    let completed = goals.iter().filter(|g| g.is_completed()).count();
    (completed * 100 / goals.len()) as u8
}
