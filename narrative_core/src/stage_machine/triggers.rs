//! Knowledge triggers - keyword rules that turn player input into facts.

pub use journey_rules::{DARK_WARNING, LETTER_EXISTS, MENTOR_GUIDANCE, QUEST_IMPORTANCE};

use journey_rules::{PlayerKnowledge, StoryElements};

/// Mentor names recognized when no story template is loaded.
const DEFAULT_MENTOR_NAMES: [&str; 2] = ["elder miriam", "miriam"];

/// Apply the fixed trigger rules to lower-cased input and return the facts
/// that were newly learned.
pub fn learn_from_input(
    input_lower: &str,
    elements: Option<&StoryElements>,
    knowledge: &mut PlayerKnowledge,
) -> Vec<String> {
    let mut learned = Vec::new();
    let mut learn = |fact: String| {
        if knowledge.learn(fact.clone()) {
            learned.push(fact);
        }
    };

    if input_lower.contains("letter") {
        learn(LETTER_EXISTS.to_string());
        if input_lower.contains("read") {
            learn(DARK_WARNING.to_string());
        }
    }

    if let Some(elements) = elements {
        if input_lower.contains("prophecy") {
            learn(elements.prophecy.to_lowercase());
        }
        if input_lower.contains("threat") || input_lower.contains("danger") {
            learn(elements.ancient_threat.to_lowercase());
        }
    }

    if mentions_mentor(input_lower, elements) {
        learn(MENTOR_GUIDANCE.to_string());
        if input_lower.contains("accept") || input_lower.contains("help") {
            learn(QUEST_IMPORTANCE.to_string());
        }
    }

    learned
}

/// Whether the input names the mentor, by full name or first name.
fn mentions_mentor(input_lower: &str, elements: Option<&StoryElements>) -> bool {
    match elements {
        Some(elements) => {
            let full = elements.mentor_name.trim().to_lowercase();
            let first = full.split_whitespace().next().unwrap_or_default();
            !first.is_empty() && (input_lower.contains(&full) || input_lower.contains(first))
        }
        None => DEFAULT_MENTOR_NAMES
            .iter()
            .any(|name| input_lower.contains(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learned(input: &str, elements: Option<&StoryElements>) -> (Vec<String>, PlayerKnowledge) {
        let mut knowledge = PlayerKnowledge::new();
        let facts = learn_from_input(&input.to_lowercase(), elements, &mut knowledge);
        (facts, knowledge)
    }

    #[test]
    fn test_letter_triggers() {
        let (facts, _) = learned("I glance at the letter", None);
        assert_eq!(facts, vec![LETTER_EXISTS.to_string()]);

        let (_, knowledge) = learned("read the letter", None);
        assert!(knowledge.knows(LETTER_EXISTS));
        assert!(knowledge.knows(DARK_WARNING));

        // Reading without a letter teaches nothing.
        let (facts, _) = learned("read a book", None);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_story_element_triggers() {
        let elements = StoryElements::canonical();
        let (_, knowledge) = learned("What is this PROPHECY about the danger?", Some(&elements));
        assert!(knowledge.knows("when the old marks glow anew, darkness stirs in shadows true"));
        assert!(knowledge.knows("a sealed evil in the forest depths"));

        // Without a template, there is nothing to learn about.
        let (facts, _) = learned("the prophecy and the threat", None);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_mentor_triggers() {
        let elements = StoryElements::canonical();

        let (facts, _) = learned("I visit Miriam", Some(&elements));
        assert_eq!(facts, vec![MENTOR_GUIDANCE.to_string()]);

        let (_, knowledge) = learned("I accept Miriam's quest", Some(&elements));
        assert!(knowledge.knows(MENTOR_GUIDANCE));
        assert!(knowledge.knows(QUEST_IMPORTANCE));

        // Accepting without the mentor is not enough.
        let (facts, _) = learned("I accept", Some(&elements));
        assert!(facts.is_empty());

        let (facts, _) = learned("Elder Miriam, help me", None);
        assert_eq!(facts, vec![MENTOR_GUIDANCE.to_string(), QUEST_IMPORTANCE.to_string()]);
    }

    #[test]
    fn test_repeated_facts_are_not_reported() {
        let mut knowledge = PlayerKnowledge::new();
        assert_eq!(learn_from_input("letter", None, &mut knowledge).len(), 1);
        assert!(learn_from_input("letter", None, &mut knowledge).is_empty());
    }
}
