//! Story elements - the thematic template that parameterizes a session.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::journey::{Stage, StageGoal, FIXED_TRIGGER_FACTS};
use crate::world_state::LocationId;

/// Shape violations in a generated template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoryElementsError {
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("field {field} has {found} entries, expected {expected}")]
    WrongCount {
        field: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("goal {goal:?} in stage {stage} can never be completed")]
    UnreachableGoal { stage: Stage, goal: String },
}

/// A goal as authored in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTemplate {
    pub description: String,
    #[serde(default)]
    pub required_actions: Vec<String>,
    #[serde(default)]
    pub optional_actions: Vec<String>,
    #[serde(default, alias = "knowledge_required")]
    pub required_knowledge: Vec<String>,
}

impl GoalTemplate {
    /// Build a fresh, incomplete goal from this template.
    pub fn to_goal(&self) -> StageGoal {
        StageGoal::new(self.description.clone())
            .with_required_actions(self.required_actions.iter().cloned())
            .with_optional_actions(self.optional_actions.iter().cloned())
            .with_required_knowledge(self.required_knowledge.iter().cloned())
    }

    /// Whether a player could ever complete this goal.
    ///
    /// It needs a required-action keyword, and every required fact must be
    /// one of `trigger_facts` unless the goal's own optional actions teach it.
    pub fn is_reachable(&self, trigger_facts: &BTreeSet<String>) -> bool {
        let has_keyword = |actions: &[String]| actions.iter().any(|a| !a.trim().is_empty());
        if !has_keyword(&self.required_actions) {
            return false;
        }
        has_keyword(&self.optional_actions)
            || self.required_knowledge.iter().all(|fact| trigger_facts.contains(fact))
    }
}

/// Template structure for a single stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStructure {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub goals: Vec<GoalTemplate>,
    /// Locations that become available when the stage is entered.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Characters that appear when the stage is entered.
    #[serde(default)]
    pub characters: Vec<String>,
}

/// The generated (or canonical) template for a session.
///
/// Created once at session start and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryElements {
    pub village_name: String,
    pub village_features: Vec<String>,
    pub mentor_name: String,
    pub mentor_title: String,
    pub ancient_threat: String,
    pub magical_elements: Vec<String>,
    /// Location name -> description.
    pub key_locations: BTreeMap<String, String>,
    pub prophecy: String,
    pub artifacts: Vec<String>,
    /// Keyed by stage tag. Tags are matched ignoring case and unknown tags
    /// are dropped.
    #[serde(default, deserialize_with = "stage_structure_by_tag")]
    pub stage_structure: BTreeMap<Stage, StageStructure>,
}

impl StoryElements {
    /// The hardcoded template used whenever generation is unavailable or invalid.
    pub fn canonical() -> Self {
        Self {
            village_name: "Willowbrook".to_string(),
            village_features: vec![
                "Ancient willow tree in the center".to_string(),
                "Mysterious standing stones".to_string(),
                "Bubbling healing spring".to_string(),
            ],
            mentor_name: "Miriam".to_string(),
            mentor_title: "Elder Sage".to_string(),
            ancient_threat: "A sealed evil in the forest depths".to_string(),
            magical_elements: vec![
                "Nature magic".to_string(),
                "Ancient runes".to_string(),
                "Spirit bonds".to_string(),
            ],
            key_locations: BTreeMap::from([
                (
                    "Elder's Cottage".to_string(),
                    "A cozy home filled with herbs and books".to_string(),
                ),
                (
                    "Sacred Grove".to_string(),
                    "Ancient trees surrounding a stone circle".to_string(),
                ),
                (
                    "Whispering Falls".to_string(),
                    "A waterfall said to speak prophecies".to_string(),
                ),
            ]),
            prophecy: "When the old marks glow anew, darkness stirs in shadows true".to_string(),
            artifacts: vec![
                "The Elder's Tome".to_string(),
                "Crystal of Seeing".to_string(),
                "Runestone of Sealing".to_string(),
            ],
            stage_structure: BTreeMap::new(),
        }
    }

    /// Check the template has the expected shape.
    pub fn validate(&self) -> Result<(), StoryElementsError> {
        require_text("village_name", &self.village_name)?;
        require_text("mentor_name", &self.mentor_name)?;
        require_text("mentor_title", &self.mentor_title)?;
        require_text("ancient_threat", &self.ancient_threat)?;
        require_text("prophecy", &self.prophecy)?;

        require_count("village_features", self.village_features.len(), "3", |n| n == 3)?;
        require_count("magical_elements", self.magical_elements.len(), "3", |n| n == 3)?;
        require_count("key_locations", self.key_locations.len(), "at least 3", |n| n >= 3)?;
        require_count("artifacts", self.artifacts.len(), "2 to 3", |n| (2..=3).contains(&n))?;

        if self.village_features.iter().any(|f| f.trim().is_empty()) {
            return Err(StoryElementsError::MissingField("village_features"));
        }
        if self.magical_elements.iter().any(|m| m.trim().is_empty()) {
            return Err(StoryElementsError::MissingField("magical_elements"));
        }
        if self.artifacts.iter().any(|a| a.trim().is_empty()) {
            return Err(StoryElementsError::MissingField("artifacts"));
        }

        let trigger_facts = self.trigger_facts();
        for (stage, structure) in &self.stage_structure {
            if let Some(goal) = structure.goals.iter().find(|g| !g.is_reachable(&trigger_facts)) {
                return Err(StoryElementsError::UnreachableGoal {
                    stage: *stage,
                    goal: goal.description.clone(),
                });
            }
        }
        Ok(())
    }

    /// Facts the keyword triggers can teach under this template.
    pub fn trigger_facts(&self) -> BTreeSet<String> {
        FIXED_TRIGGER_FACTS
            .iter()
            .map(|fact| fact.to_string())
            .chain([self.prophecy.to_lowercase(), self.ancient_threat.to_lowercase()])
            .collect()
    }

    /// Fresh goals for a stage from the template. `None` when the template
    /// sets no goals for the stage or any of them can never be completed.
    pub fn stage_goals(&self, stage: Stage) -> Option<Vec<StageGoal>> {
        let structure = self.structure_for(stage)?;
        let trigger_facts = self.trigger_facts();
        if structure.goals.is_empty() || !structure.goals.iter().all(|g| g.is_reachable(&trigger_facts)) {
            return None;
        }
        Some(structure.goals.iter().map(GoalTemplate::to_goal).collect())
    }

    /// Id of the story's village location.
    pub fn village_id(&self) -> LocationId {
        LocationId::new(self.village_name.trim().to_lowercase())
    }

    /// Id of the mentor's home, e.g. `miriam's_cottage`.
    pub fn mentor_home_id(&self) -> LocationId {
        let first_name = self
            .mentor_name
            .split_whitespace()
            .next()
            .unwrap_or("mentor")
            .to_lowercase();
        LocationId::new(format!("{}'s_cottage", first_name))
    }

    /// Template structure for a stage, if the template provides one.
    pub fn structure_for(&self, stage: Stage) -> Option<&StageStructure> {
        self.stage_structure.get(&stage)
    }
}

impl Default for StoryElements {
    fn default() -> Self {
        Self::canonical()
    }
}

fn stage_structure_by_tag<'de, D>(deserializer: D) -> Result<BTreeMap<Stage, StageStructure>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, StageStructure>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(tag, structure)| Stage::from_tag(&tag).map(|stage| (stage, structure)))
        .collect())
}

fn require_text(field: &'static str, value: &str) -> Result<(), StoryElementsError> {
    if value.trim().is_empty() {
        Err(StoryElementsError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_count(
    field: &'static str,
    found: usize,
    expected: &'static str,
    ok: impl Fn(usize) -> bool,
) -> Result<(), StoryElementsError> {
    if ok(found) {
        Ok(())
    } else {
        Err(StoryElementsError::WrongCount {
            field,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_valid() {
        let elements = StoryElements::canonical();
        assert_eq!(elements.validate(), Ok(()));
        assert_eq!(elements.village_id().as_str(), "willowbrook");
        assert_eq!(elements.mentor_home_id().as_str(), "miriam's_cottage");
        assert!(elements.structure_for(Stage::OrdinaryWorld).is_none());
    }

    #[test]
    fn test_validation_rejects_bad_shapes() {
        let mut elements = StoryElements::canonical();
        elements.mentor_name = "  ".to_string();
        assert_eq!(
            elements.validate(),
            Err(StoryElementsError::MissingField("mentor_name"))
        );

        let mut elements = StoryElements::canonical();
        elements.artifacts.truncate(1);
        assert!(matches!(
            elements.validate(),
            Err(StoryElementsError::WrongCount { field: "artifacts", found: 1, .. })
        ));

        let mut elements = StoryElements::canonical();
        elements.magical_elements.push("Star songs".to_string());
        assert!(elements.validate().is_err());
    }

    #[test]
    fn test_parse_with_stage_structure() {
        let json = r#"{
            "village_name": "Thornfield",
            "village_features": ["a", "b", "c"],
            "mentor_name": "Aldric Vane",
            "mentor_title": "Keeper of Lanterns",
            "ancient_threat": "The Hollow King",
            "magical_elements": ["x", "y", "z"],
            "key_locations": {"Old Mill": "d1", "Mossy Grove": "d2", "Bell Tower": "d3"},
            "prophecy": "When bells fall silent",
            "artifacts": ["Lantern", "Bell"],
            "stage_structure": {
                "ordinary_world": {
                    "theme": "quiet before the storm",
                    "goals": [
                        {"description": "Answer", "required_actions": ["accept", "help"]}
                    ],
                    "locations": ["Old Well"],
                    "characters": ["Pip"]
                }
            }
        }"#;

        let elements: StoryElements = serde_json::from_str(json).unwrap();
        assert_eq!(elements.validate(), Ok(()));
        assert_eq!(elements.mentor_home_id().as_str(), "aldric's_cottage");

        let structure = elements.structure_for(Stage::OrdinaryWorld).unwrap();
        let goal = structure.goals[0].to_goal();
        assert!(goal.required_knowledge().is_empty());
        assert!(goal.matches_required_action("i will help"));
        assert_eq!(elements.stage_goals(Stage::OrdinaryWorld).map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_stage_tags_ignore_case_and_unknown_tags() {
        let json = r#"{
            "village_name": "Thornfield",
            "village_features": ["a", "b", "c"],
            "mentor_name": "Aldric",
            "mentor_title": "Keeper",
            "ancient_threat": "The Hollow King",
            "magical_elements": ["x", "y", "z"],
            "key_locations": {"Old Mill": "d1", "Mossy Grove": "d2", "Bell Tower": "d3"},
            "prophecy": "When bells fall silent",
            "artifacts": ["Lantern", "Bell"],
            "stage_structure": {
                "ORDINARY_WORLD": {"theme": "hush"},
                "Meeting_Mentor": {"theme": "lanterns"},
                "EPILOGUE": {"theme": "never used"}
            }
        }"#;

        let elements: StoryElements = serde_json::from_str(json).unwrap();
        assert_eq!(elements.stage_structure.len(), 2);
        assert_eq!(elements.structure_for(Stage::OrdinaryWorld).unwrap().theme, "hush");
        assert_eq!(elements.structure_for(Stage::MeetingMentor).unwrap().theme, "lanterns");
    }

    fn with_goal(goal: GoalTemplate) -> StoryElements {
        let mut elements = StoryElements::canonical();
        elements.stage_structure.insert(
            Stage::CallToAdventure,
            StageStructure {
                goals: vec![goal],
                ..Default::default()
            },
        );
        elements
    }

    fn goal(required: &[&str], optional: &[&str], knowledge: &[&str]) -> GoalTemplate {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        GoalTemplate {
            description: "Hear the bell".to_string(),
            required_actions: owned(required),
            optional_actions: owned(optional),
            required_knowledge: owned(knowledge),
        }
    }

    #[test]
    fn test_validation_rejects_goals_that_never_complete() {
        let unreachable = StoryElementsError::UnreachableGoal {
            stage: Stage::CallToAdventure,
            goal: "Hear the bell".to_string(),
        };

        // Nothing teaches "bell rang".
        let elements = with_goal(goal(&["listen"], &[], &["bell rang"]));
        assert_eq!(elements.validate(), Err(unreachable.clone()));
        assert_eq!(elements.stage_goals(Stage::CallToAdventure), None);

        // No required action at all.
        let elements = with_goal(goal(&[], &["wait"], &[]));
        assert_eq!(elements.validate(), Err(unreachable.clone()));
        let elements = with_goal(goal(&["  "], &[], &[]));
        assert_eq!(elements.validate(), Err(unreachable));
    }

    #[test]
    fn test_validation_accepts_learnable_knowledge() {
        // Taught by the goal's own optional actions.
        let elements = with_goal(goal(&["listen"], &["wait"], &["bell rang"]));
        assert_eq!(elements.validate(), Ok(()));

        // Taught by the fixed triggers and by the template's own prophecy.
        let prophecy = StoryElements::canonical().prophecy.to_lowercase();
        let elements = with_goal(goal(&["listen"], &[], &["dark warning", prophecy.as_str()]));
        assert_eq!(elements.validate(), Ok(()));
        assert_eq!(elements.stage_goals(Stage::CallToAdventure).map(|g| g.len()), Some(1));
    }
}
