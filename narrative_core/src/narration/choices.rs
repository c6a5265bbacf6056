//! Choice handling for narration replies.

/// Every valid narration reply offers choices after this marker.
pub const CHOICE_MARKER: &str = "You can:";

/// Whether a reply can be shown to the player: non-empty and offering choices.
pub fn is_valid_narration(text: &str) -> bool {
    !text.trim().is_empty() && text.contains(CHOICE_MARKER)
}

/// Split a reply into the narration before the marker and the options after
/// it. Options are separated by `" or "`. Returns `None` if the marker is
/// missing.
pub fn parse_choices(text: &str) -> Option<(String, Vec<String>)> {
    let (context, choices) = text.split_once(CHOICE_MARKER)?;
    let options = choices
        .trim()
        .trim_end_matches('.')
        .split(" or ")
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect();
    Some((context.trim().to_string(), options))
}
