//! Character introductions - planned arrivals per stage and the constructors
//! that build each role.

use journey_rules::{Character, CharacterRole, LocationId, Stage, StoryElements};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Name given to the deuteragonist.
pub const DEUTERAGONIST_NAME: &str = "Lyra";

/// Everything a constructor may draw on.
pub struct IntroductionContext<'a> {
    pub stage: Stage,
    pub elements: Option<&'a StoryElements>,
    /// Names already on the roster.
    pub taken: Vec<&'a str>,
}

impl IntroductionContext<'_> {
    fn home(&self) -> LocationId {
        self.elements
            .map(StoryElements::village_id)
            .unwrap_or_else(|| LocationId::from("village"))
    }
}

/// Builds a character for a role, or `None` if no candidate is available.
pub type IntroductionFn = fn(&IntroductionContext<'_>) -> Option<Character>;

/// Maps each introducible role to its constructor.
#[derive(Clone)]
pub struct IntroductionRegistry {
    constructors: HashMap<CharacterRole, IntroductionFn>,
}

impl std::fmt::Debug for IntroductionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut roles: Vec<&str> = self.constructors.keys().map(CharacterRole::as_str).collect();
        roles.sort_unstable();
        f.debug_struct("IntroductionRegistry").field("roles", &roles).finish()
    }
}

impl Default for IntroductionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(CharacterRole::Deuteragonist, deuteragonist);
        registry.register(CharacterRole::Mentor, mentor);
        registry.register(CharacterRole::Supporting, supporting);
        registry
    }
}

impl IntroductionRegistry {
    /// A registry with no constructors.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for a role.
    pub fn register(&mut self, role: CharacterRole, constructor: IntroductionFn) {
        self.constructors.insert(role, constructor);
    }

    /// Build a character for `role`, if a constructor is registered.
    pub fn build(&self, role: CharacterRole, context: &IntroductionContext<'_>) -> Option<Character> {
        self.constructors.get(&role).and_then(|build| build(context))
    }
}

/// The default plan of who arrives when. The mentor is present from the start.
pub fn default_introduction_plan() -> BTreeMap<Stage, VecDeque<CharacterRole>> {
    BTreeMap::from([
        (Stage::CallToAdventure, VecDeque::from([CharacterRole::Deuteragonist])),
        (Stage::MeetingMentor, VecDeque::from([CharacterRole::Supporting])),
        (
            Stage::TestsAlliesEnemies,
            VecDeque::from([CharacterRole::Supporting, CharacterRole::Supporting]),
        ),
        (Stage::ApproachOrdeal, VecDeque::from([CharacterRole::Supporting])),
    ])
}

fn deuteragonist(context: &IntroductionContext<'_>) -> Option<Character> {
    let character = match context.elements {
        Some(elements) => Character::new(
            DEUTERAGONIST_NAME,
            CharacterRole::Deuteragonist,
            format!(
                "A traveler with knowledge of {}",
                elements.ancient_threat.to_lowercase()
            ),
            "marketplace",
        )
        .with_knowledge(
            std::iter::once(elements.ancient_threat.clone())
                .chain(elements.magical_elements.get(1).cloned()),
        )
        .with_inventory(elements.artifacts.get(1).cloned()),
        None => Character::new(
            DEUTERAGONIST_NAME,
            CharacterRole::Deuteragonist,
            "A traveler with knowledge of the ancient threat",
            "marketplace",
        )
        .with_knowledge(["the ancient threat"]),
    };
    Some(character)
}

fn mentor(context: &IntroductionContext<'_>) -> Option<Character> {
    let character = match context.elements {
        Some(elements) => Character::new(
            elements.mentor_name.clone(),
            CharacterRole::Mentor,
            format!("{}, keeper of ancient knowledge", elements.mentor_title),
            elements.village_id(),
        )
        .with_knowledge(
            [elements.prophecy.clone(), elements.ancient_threat.clone()]
                .into_iter()
                .chain(elements.magical_elements.iter().cloned()),
        )
        .with_inventory(elements.artifacts.first().cloned()),
        None => Character::new(
            "Elder Miriam",
            CharacterRole::Mentor,
            "A wise village elder with knowledge of ancient prophecies",
            "village",
        )
        .with_knowledge(["village history", "ancient prophecies"]),
    };
    Some(character)
}

/// Supporting cast by stage: (name, description, knowledge).
const SUPPORTING_CAST: &[(Stage, &str, &str, [&str; 2])] = &[
    (
        Stage::MeetingMentor,
        "Marcus",
        "A skilled blacksmith with a warrior's past",
        ["weaponry", "local rumors"],
    ),
    (
        Stage::TestsAlliesEnemies,
        "Wren",
        "A sharp-eyed scout who knows the hidden trails",
        ["hidden trails", "beast lore"],
    ),
    (
        Stage::TestsAlliesEnemies,
        "Tobias",
        "A wandering merchant with a loose tongue and a ledger of debts",
        ["trade routes", "rumors from afar"],
    ),
    (
        Stage::ApproachOrdeal,
        "Sister Ysolde",
        "A healer who has seen the threat's work firsthand",
        ["healing", "signs of corruption"],
    ),
];

fn supporting(context: &IntroductionContext<'_>) -> Option<Character> {
    SUPPORTING_CAST
        .iter()
        .filter(|(stage, name, _, _)| *stage == context.stage && !context.taken.contains(name))
        .map(|(_, name, description, knowledge)| {
            Character::new(*name, CharacterRole::Supporting, *description, context.home())
                .with_knowledge(*knowledge)
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(stage: Stage, elements: Option<&StoryElements>) -> IntroductionContext<'_> {
        IntroductionContext {
            stage,
            elements,
            taken: Vec::new(),
        }
    }

    #[test]
    fn test_deuteragonist_draws_on_elements() {
        let elements = StoryElements::canonical();
        let registry = IntroductionRegistry::default();

        let lyra = registry
            .build(CharacterRole::Deuteragonist, &context(Stage::CallToAdventure, Some(&elements)))
            .unwrap();
        assert_eq!(lyra.name(), DEUTERAGONIST_NAME);
        assert!(lyra.description().contains("a sealed evil in the forest depths"));
        assert_eq!(
            lyra.knowledge(),
            &["A sealed evil in the forest depths".to_string(), "Ancient runes".to_string()]
        );
        assert_eq!(lyra.inventory(), &["Crystal of Seeing".to_string()]);
    }

    #[test]
    fn test_mentor_falls_back_without_elements() {
        let registry = IntroductionRegistry::default();
        let mentor = registry
            .build(CharacterRole::Mentor, &context(Stage::OrdinaryWorld, None))
            .unwrap();
        assert_eq!(mentor.name(), "Elder Miriam");
        assert_eq!(mentor.location().as_str(), "village");
    }

    #[test]
    fn test_supporting_cast_is_keyed_by_stage() {
        let elements = StoryElements::canonical();
        let registry = IntroductionRegistry::default();

        let marcus = registry
            .build(CharacterRole::Supporting, &context(Stage::MeetingMentor, Some(&elements)))
            .unwrap();
        assert_eq!(marcus.name(), "Marcus");
        assert_eq!(marcus.location().as_str(), "willowbrook");

        let mut tests_stage = context(Stage::TestsAlliesEnemies, None);
        assert_eq!(registry.build(CharacterRole::Supporting, &tests_stage).unwrap().name(), "Wren");
        tests_stage.taken.push("Wren");
        assert_eq!(registry.build(CharacterRole::Supporting, &tests_stage).unwrap().name(), "Tobias");

        assert!(registry
            .build(CharacterRole::Supporting, &context(Stage::Ordeal, None))
            .is_none());
    }

    #[test]
    fn test_unregistered_role_builds_nothing() {
        let registry = IntroductionRegistry::default();
        assert!(registry
            .build(CharacterRole::Enemy, &context(Stage::Ordeal, None))
            .is_none());
        assert!(IntroductionRegistry::empty()
            .build(CharacterRole::Mentor, &context(Stage::Ordeal, None))
            .is_none());
    }

    #[test]
    fn test_default_plan() {
        let plan = default_introduction_plan();
        assert_eq!(plan[&Stage::TestsAlliesEnemies].len(), 2);
        assert!(!plan.contains_key(&Stage::OrdinaryWorld));
    }
}
