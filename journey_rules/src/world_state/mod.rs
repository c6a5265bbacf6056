//! World graph - locations, movement, and the append-only event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use crate::story_elements::StoryElements;

/// How many recent events are considered for context and debug output.
pub const RECENT_EVENT_WINDOW: usize = 5;

/// Identifier for locations, e.g. `"forest_edge"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an id from a display name: lower-cased, spaces become `_`.
    pub fn from_name(name: &str) -> Self {
        Self(name.trim().to_lowercase().replace(' ', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&LocationId> for LocationId {
    fn from(id: &LocationId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for LocationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for world events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Significance tier of a world event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Minor,
    Major,
}

/// A location in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    description: String,
    connections: BTreeSet<LocationId>,
    features: Vec<String>,
    discovered: bool,
}

impl Location {
    pub fn new<I, F>(
        id: impl Into<LocationId>,
        description: impl Into<String>,
        connections: I,
        features: F,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LocationId>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            id: id.into(),
            description: description.into(),
            connections: connections.into_iter().map(Into::into).collect(),
            features: features.into_iter().map(Into::into).collect(),
            discovered: false,
        }
    }

    pub fn id(&self) -> &LocationId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn connections(&self) -> &BTreeSet<LocationId> {
        &self.connections
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    pub fn connects_to(&self, other: &str) -> bool {
        self.connections.contains(other)
    }
}

/// An immutable record of something significant that happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub location: LocationId,
    pub significance: Significance,
    pub consequences: Vec<String>,
}

/// Narrative context for a single location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationContext {
    pub id: LocationId,
    pub description: String,
    pub features: Vec<String>,
    pub connections: Vec<LocationId>,
    /// Descriptions of events at this location among the most recent
    /// [`RECENT_EVENT_WINDOW`] events of the whole log.
    pub recent_events: Vec<String>,
}

impl std::fmt::Display for LocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connections: Vec<&str> = self.connections.iter().map(LocationId::as_str).collect();
        writeln!(f, "Location: {}", self.id)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Notable features: {}", self.features.join(", "))?;
        writeln!(f, "Connected areas: {}", connections.join(", "))?;
        write!(f, "Recent events: {}", self.recent_events.join(", "))
    }
}

/// Read-only snapshot of the world for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDebugState {
    pub current_location: LocationId,
    pub locations: Vec<Location>,
    pub recent_events: Vec<WorldEvent>,
}

/// Built-in locations every world starts with.
const STARTING_LOCATIONS: [(&str, &str, [&str; 2], [&str; 3]); 3] = [
    (
        "village",
        "A peaceful village nestled between ancient forests and rolling hills",
        ["forest_edge", "marketplace"],
        ["old well", "village square", "elder's house"],
    ),
    (
        "forest_edge",
        "The boundary where civilization meets wild nature",
        ["village", "deep_forest"],
        ["ancient stones", "worn path", "mysterious markings"],
    ),
    (
        "marketplace",
        "The bustling heart of village life",
        ["village", "trader_road"],
        ["merchant stalls", "town crier post", "community board"],
    ),
];

/// The world: locations, where the player stands, and what has happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGraph {
    locations: HashMap<LocationId, Location>,
    current_location: LocationId,
    events: Vec<WorldEvent>,
}

impl Default for WorldGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldGraph {
    /// A world holding only the built-in starting locations, standing in the village.
    pub fn new() -> Self {
        let mut world = Self {
            locations: HashMap::new(),
            current_location: LocationId::from("village"),
            events: Vec::new(),
        };
        for (id, description, connections, features) in STARTING_LOCATIONS {
            world.add_location(id, description, connections, features);
        }
        world
    }

    /// Build a world from a story template: the starting locations plus the
    /// story's village, the mentor's cottage, and each key location. The
    /// player starts in the story's village.
    ///
    /// Story locations whose ids match a starting location keep the starting
    /// description and gain the story's connections.
    pub fn from_story_elements(elements: &StoryElements) -> Self {
        let mut world = Self::new();
        let village = elements.village_id();
        let cottage = elements.mentor_home_id();
        let no_links = Vec::<LocationId>::new();

        world.add_location(
            village.clone(),
            format!(
                "A peaceful village known for {}",
                elements
                    .village_features
                    .first()
                    .map(|f| f.to_lowercase())
                    .unwrap_or_else(|| "its quiet charm".to_string())
            ),
            no_links.clone(),
            elements.village_features.clone(),
        );
        world.add_location(
            cottage.clone(),
            format!("Home of {}, the {}", elements.mentor_name, elements.mentor_title),
            no_links.clone(),
            ["Ancient tomes", "Mystical artifacts", "Herb garden"],
        );
        world.connect(village.as_str(), cottage.as_str());

        let sign = elements
            .magical_elements
            .first()
            .map(|m| format!("Signs of {}", m.to_lowercase()));
        for (name, description) in &elements.key_locations {
            let id = LocationId::from_name(name);
            world.add_location(id.clone(), description.as_str(), no_links.clone(), sign.clone());
            world.connect(village.as_str(), id.as_str());

            let lower = name.to_lowercase();
            if lower.contains("forest") {
                world.connect(id.as_str(), "forest_edge");
            }
            if lower.contains("grove") {
                world.connect(id.as_str(), cottage.as_str());
            }
        }

        world.current_location = village;
        world
    }

    /// Register a location. An id that is already registered is left untouched
    /// and `false` is returned.
    pub fn add_location<I, F>(
        &mut self,
        id: impl Into<LocationId>,
        description: impl Into<String>,
        connections: I,
        features: F,
    ) -> bool
    where
        I: IntoIterator,
        I::Item: Into<LocationId>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        let location = Location::new(id, description, connections, features);
        if self.locations.contains_key(location.id()) {
            return false;
        }
        self.locations.insert(location.id.clone(), location);
        true
    }

    /// Link two registered locations in both directions.
    ///
    /// Returns `false` and changes nothing unless both ids are registered and
    /// distinct. Linking an already linked pair is harmless.
    pub fn connect(&mut self, a: &str, b: &str) -> bool {
        if a == b || !self.locations.contains_key(a) || !self.locations.contains_key(b) {
            return false;
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(location) = self.locations.get_mut(from) {
                location.connections.insert(LocationId::from(to));
            }
        }
        true
    }

    /// Append an event to the log. The location is not validated.
    pub fn record_event<C>(
        &mut self,
        description: impl Into<String>,
        location: impl Into<LocationId>,
        significance: Significance,
        consequences: C,
    ) -> EventId
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let event = WorldEvent {
            id: EventId::new(),
            timestamp: Utc::now(),
            description: description.into(),
            location: location.into(),
            significance,
            consequences: consequences.into_iter().map(Into::into).collect(),
        };
        let id = event.id;
        self.events.push(event);
        id
    }

    /// Context for a location (the current one when `id` is `None`).
    ///
    /// Recent events are the last [`RECENT_EVENT_WINDOW`] events of the whole
    /// log, filtered to this location afterwards.
    pub fn location_context(&self, id: Option<&str>) -> Option<LocationContext> {
        let id = id.unwrap_or(self.current_location.as_str());
        let location = self.locations.get(id)?;

        let recent_events = self
            .recent_events()
            .iter()
            .filter(|event| event.location.as_str() == id)
            .map(|event| event.description.clone())
            .collect();

        Some(LocationContext {
            id: location.id.clone(),
            description: location.description.clone(),
            features: location.features.clone(),
            connections: location.connections.iter().cloned().collect(),
            recent_events,
        })
    }

    /// Move to a connected location. Returns `false` if the destination is
    /// unknown or not connected to where the player stands.
    pub fn move_to(&mut self, destination: &str) -> bool {
        let connected = self
            .locations
            .get(self.current_location.as_str())
            .is_some_and(|current| current.connects_to(destination));
        if !connected {
            return false;
        }

        match self.locations.get_mut(destination) {
            Some(location) => {
                location.discovered = true;
                self.current_location = location.id.clone();
                true
            }
            None => false,
        }
    }

    pub fn current_location(&self) -> &LocationId {
        &self.current_location
    }

    pub fn get_location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// The full event log, oldest first.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// The last [`RECENT_EVENT_WINDOW`] events of the log.
    pub fn recent_events(&self) -> &[WorldEvent] {
        let start = self.events.len().saturating_sub(RECENT_EVENT_WINDOW);
        &self.events[start..]
    }

    /// Snapshot of every location (sorted by id) and the recent events.
    pub fn debug_state(&self) -> WorldDebugState {
        let mut locations: Vec<Location> = self.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.id.cmp(&b.id));
        WorldDebugState {
            current_location: self.current_location.clone(),
            locations,
            recent_events: self.recent_events().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_has_starting_locations() {
        let world = WorldGraph::new();
        assert_eq!(world.location_count(), 3);
        assert_eq!(world.current_location().as_str(), "village");
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_duplicate_location_is_ignored() {
        let mut world = WorldGraph::new();
        assert!(!world.add_location("village", "Overwritten", Vec::<String>::new(), Vec::<String>::new()));
        assert_eq!(
            world.get_location("village").unwrap().description(),
            "A peaceful village nestled between ancient forests and rolling hills"
        );

        assert!(world.add_location("ruins", "Old ruins", ["village"], ["broken arch"]));
        assert_eq!(world.location_count(), 4);
    }

    #[test]
    fn test_move_requires_connection() {
        let mut world = WorldGraph::new();

        // Not connected from the village.
        assert!(!world.move_to("deep_forest"));
        // Connected, but never registered.
        world.add_location("lonely_hill", "A hill", Vec::<String>::new(), Vec::<String>::new());
        assert!(!world.move_to("lonely_hill"));
        assert_eq!(world.current_location().as_str(), "village");

        assert!(!world.get_location("forest_edge").unwrap().is_discovered());
        assert!(world.move_to("forest_edge"));
        assert_eq!(world.current_location().as_str(), "forest_edge");
        assert!(world.get_location("forest_edge").unwrap().is_discovered());
    }

    #[test]
    fn test_event_log_is_append_only() {
        let mut world = WorldGraph::new();
        world.record_event("First", "village", Significance::Minor, ["a"]);
        world.record_event("Second", "nowhere", Significance::Major, Vec::<String>::new());

        assert_eq!(world.events().len(), 2);
        assert_eq!(world.events()[0].description, "First");
        assert_eq!(world.events()[1].location.as_str(), "nowhere");
        assert!(world.events()[0].timestamp <= world.events()[1].timestamp);
    }

    #[test]
    fn test_location_context_uses_global_recent_window() {
        let mut world = WorldGraph::new();
        world.record_event("Old village event", "village", Significance::Minor, Vec::<String>::new());
        for i in 0..4 {
            world.record_event(format!("Market {}", i), "marketplace", Significance::Minor, Vec::<String>::new());
        }
        world.record_event("New village event", "village", Significance::Major, Vec::<String>::new());

        // The oldest village event has dropped out of the global window of five,
        // even though the village has only two events.
        let context = world.location_context(None).unwrap();
        assert_eq!(context.recent_events, vec!["New village event".to_string()]);

        let market = world.location_context(Some("marketplace")).unwrap();
        assert_eq!(market.recent_events.len(), 4);

        assert!(world.location_context(Some("atlantis")).is_none());
    }

    #[test]
    fn test_location_context_display() {
        let world = WorldGraph::new();
        let text = world.location_context(Some("marketplace")).unwrap().to_string();
        assert!(text.starts_with("Location: marketplace"));
        assert!(text.contains("merchant stalls"));
        assert!(text.contains("Connected areas: trader_road, village"));
    }

    #[test]
    fn test_from_story_elements() {
        let elements = StoryElements::canonical();
        let mut world = WorldGraph::from_story_elements(&elements);

        assert_eq!(world.current_location().as_str(), "willowbrook");
        let village = world.get_location("willowbrook").unwrap();
        assert!(village.connects_to("miriam's_cottage"));
        assert!(village.connects_to("sacred_grove"));
        assert!(village.connects_to("whispering_falls"));

        let grove = world.get_location("sacred_grove").unwrap();
        assert!(grove.connects_to("miriam's_cottage"));
        assert_eq!(grove.features(), &["Signs of nature magic".to_string()]);

        assert!(world.move_to("sacred_grove"));
        assert!(world.move_to("miriam's_cottage"));
        assert!(world.move_to("willowbrook"));
        assert!(world.move_to("whispering_falls"));
        assert!(world.move_to("willowbrook"));
    }

    #[test]
    fn test_connect_links_both_ways() {
        let mut world = WorldGraph::new();
        world.add_location("ruins", "Old ruins", Vec::<String>::new(), Vec::<String>::new());
        assert!(!world.move_to("ruins"));

        assert!(world.connect("village", "ruins"));
        assert!(world.connect("ruins", "village"));
        assert!(world.move_to("ruins"));
        assert!(world.move_to("village"));

        assert!(!world.connect("village", "village"));
        assert!(!world.connect("village", "atlantis"));
        assert!(world.get_location("atlantis").is_none());
    }

    #[test]
    fn test_story_locations_merge_with_starting_ones() {
        let mut elements = StoryElements::canonical();
        elements
            .key_locations
            .insert("Marketplace".to_string(), "Stalls of rune-carved wares".to_string());
        let mut world = WorldGraph::from_story_elements(&elements);

        let market = world.get_location("marketplace").unwrap();
        assert_eq!(market.description(), "The bustling heart of village life");
        assert!(market.connects_to("trader_road"));
        assert!(world.move_to("marketplace"));
        assert!(world.move_to("willowbrook"));

        let mut elements = StoryElements::canonical();
        elements.village_name = "Village".to_string();
        let mut world = WorldGraph::from_story_elements(&elements);
        assert_eq!(world.current_location().as_str(), "village");
        assert!(world.move_to("miriam's_cottage"));
        assert!(world.move_to("village"));
        assert!(world.move_to("forest_edge"));
    }

    #[test]
    fn test_debug_state_is_sorted_and_windowed() {
        let mut world = WorldGraph::new();
        for i in 0..8 {
            world.record_event(format!("Event {}", i), "village", Significance::Minor, Vec::<String>::new());
        }
        let debug = world.debug_state();
        assert_eq!(debug.recent_events.len(), RECENT_EVENT_WINDOW);
        assert_eq!(debug.recent_events[0].description, "Event 3");
        assert_eq!(debug.locations[0].id().as_str(), "forest_edge");
    }
}
