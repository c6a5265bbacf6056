//! Story-element generation with a canonical fallback.

use journey_rules::StoryElements;
use tracing::{info, warn};

use super::{story_elements_prompt, GenerationOptions, NarrationError, Narrator};

/// Produces the story template for a new session.
///
/// Without a narrator, or whenever the reply cannot be used, the canonical
/// template is returned instead. Generation never fails.
#[derive(Debug, Clone)]
pub struct StoryElementsGenerator {
    narrator: Option<Narrator>,
    options: GenerationOptions,
}

impl StoryElementsGenerator {
    pub fn new(narrator: Option<Narrator>, options: GenerationOptions) -> Self {
        Self { narrator, options }
    }

    pub async fn generate(&self) -> StoryElements {
        let Some(narrator) = &self.narrator else {
            return StoryElements::canonical();
        };

        let parsed = match narrator.generate(story_elements_prompt(), &self.options).await {
            Ok(reply) => parse_story_elements(&reply),
            Err(err) => Err(err),
        };
        match parsed {
            Ok(elements) => {
                info!(village = %elements.village_name, "Generated story elements");
                elements
            }
            Err(err) => {
                warn!(error = %err, "Story element generation failed, using canonical template");
                StoryElements::canonical()
            }
        }
    }
}

/// The JSON object in a reply: everything from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse and validate a story template from a reply that may wrap the JSON
/// in other text.
pub fn parse_story_elements(reply: &str) -> Result<StoryElements, NarrationError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| NarrationError::InvalidResponse("no JSON object in reply".to_string()))?;
    let elements: StoryElements =
        serde_json::from_str(json).map_err(|e| NarrationError::InvalidResponse(e.to_string()))?;
    elements
        .validate()
        .map_err(|e| NarrationError::InvalidResponse(e.to_string()))?;
    Ok(elements)
}
