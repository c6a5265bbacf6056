//! Fixed prompts for the opening scene and story-element generation.

use super::CHOICE_MARKER;

/// Prompt for the opening scene, set in the named village.
pub fn opening_prompt(village_name: &str) -> String {
    format!(
        "System: You are a fantasy RPG Dungeon Master creating an opening scene for a new adventure.\n\n\
         Create an atmospheric opening that:\n\
         1. Sets the scene in the peaceful village of {village}\n\
         2. Introduces an inciting incident involving a mysterious message\n\
         3. Balances mundane life with hints of adventure\n\
         4. Gives the player agency through meaningful initial choices\n\n\
         Format your response as:\n\
         [Time and setting description]. [Inciting incident with the mysterious message]. \
         {marker} [Read or investigate the message] or [Continue with normal routine]\n\n\
         Response:",
        village = village_name,
        marker = CHOICE_MARKER,
    )
}

/// Prompt asking for a story template as a single JSON object.
pub fn story_elements_prompt() -> &'static str {
    r#"System: Create a cohesive set of fantasy story elements including stage goals.

Generate unique elements:
- Village name and exactly 3 village features
- A mentor with a name and a title
- An ancient, dormant threat
- Exactly 3 magical elements
- At least 3 key locations with descriptions
- A cryptic prophecy
- 2 or 3 magical artifacts

Then, for any of the stages ordinary_world, call_to_adventure and meeting_mentor,
describe a theme, goals with required actions, optional actions and required
knowledge, important locations, and key characters. Every goal needs at least
one required action. The player learns a goal's required knowledge by taking
one of its optional actions, so a goal with required knowledge must list
optional actions too.

Format your response as JSON:
{
    "village_name": "name",
    "village_features": ["feature1", "feature2", "feature3"],
    "mentor_name": "name",
    "mentor_title": "title",
    "ancient_threat": "description",
    "magical_elements": ["element1", "element2", "element3"],
    "key_locations": {
        "location1": "description1",
        "location2": "description2",
        "location3": "description3"
    },
    "prophecy": "prophecy text",
    "artifacts": ["artifact1", "artifact2", "artifact3"],
    "stage_structure": {
        "ordinary_world": {
            "theme": "theme",
            "goals": [
                {
                    "description": "goal description",
                    "required_actions": ["action1", "action2"],
                    "optional_actions": ["action1", "action2"],
                    "required_knowledge": ["knowledge1"]
                }
            ],
            "locations": ["location1"],
            "characters": ["character1"]
        }
    }
}

Response:"#
}
