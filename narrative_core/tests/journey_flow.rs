//! End-to-end play through the opening of the journey.

use async_trait::async_trait;
use journey_rules::{Significance, Stage, MAX_TRUST, MIN_TRUST};
use narrative_core::{
    EngineConfig, GenerationOptions, NarrationClient, NarrationError, SessionStore,
    DEFAULT_OPENING, MAX_ACTIVE_SUPPORTING,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies with scripted lines in order, then fails.
struct ScriptedClient {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl NarrationClient for ScriptedClient {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String, NarrationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| NarrationError::Transport("script exhausted".to_string()))
    }
}

#[tokio::test]
async fn test_first_stage_to_call_to_adventure() {
    let mut store = SessionStore::default();
    let id = store.create();

    let opening = store.start_new_game(id).await.unwrap();
    assert_eq!(opening.response, DEFAULT_OPENING);
    {
        let session = store.get(id).unwrap();
        assert_eq!(session.world().events().len(), 1);
        assert_eq!(session.world().events()[0].description, "Story begins");
    }

    let reply = store.respond(id, "read the letter").await.unwrap();
    assert_eq!(reply.progress.stage, Stage::OrdinaryWorld);
    assert_eq!(reply.progress.percentage, 50);
    {
        let session = store.get(id).unwrap();
        let knowledge = session.stages().knowledge();
        assert!(knowledge.knows("letter exists"));
        assert!(knowledge.knows("dark warning"));
        assert!(session.stages().goals()[0].is_completed());
    }

    let reply = store.respond(id, "ask the elder for help").await.unwrap();
    assert_eq!(reply.progress.stage, Stage::CallToAdventure);
    assert_eq!(reply.progress.percentage, 0);

    let session = store.get(id).unwrap();
    let events = session.world().events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].significance, Significance::Major);
    assert_eq!(
        events[1].description,
        "The story moves from ordinary_world to call_to_adventure"
    );
    assert_eq!(session.roster().deuteragonist(), Some("Lyra"));
    assert!(session
        .roster()
        .debug_state()
        .planned_introductions[&Stage::CallToAdventure]
        .is_empty());
}

#[tokio::test]
async fn test_start_game_resets_mid_journey() {
    let mut store = SessionStore::default();
    let id = store.create();
    store.start_new_game(id).await.unwrap();
    for input in ["read the letter", "ask for advice", "I accept Miriam's quest and learn"] {
        store.respond(id, input).await.unwrap();
    }
    assert_eq!(store.get(id).unwrap().current_stage(), Stage::RefusalOfCall);

    let reply = store.respond(id, "start game").await.unwrap();
    assert_eq!(reply.progress.stage, Stage::OrdinaryWorld);
    assert_eq!(reply.progress.percentage, 0);
    assert!(reply.debug.is_some());

    let session = store.get(id).unwrap();
    assert_eq!(session.world().events().len(), 1);
    assert_eq!(session.world().events()[0].description, "Story begins");
    assert!(session.stages().knowledge().is_empty());
}

#[tokio::test]
async fn test_invariants_hold_over_a_long_session() {
    let mut store = SessionStore::default();
    let id = store.create();
    store.start_new_game(id).await.unwrap();

    let inputs = [
        "read the letter",
        "ask the elder",
        "I accept Miriam's quest and learn",
        "I refuse, then decide to go",
        "listen and accept the gift from miriam",
        "leave",
        "fight and befriend lyra",
        "talk to Marcus and Wren",
        "plan with Sister Ysolde",
        "confront the evil",
        "steal the crown",
    ];

    let mut last_stage = Stage::first();
    let mut last_progress = 0;
    for input in inputs {
        let reply = store.respond(id, input).await.unwrap();
        assert!(reply.progress.stage >= last_stage);
        assert!(reply.progress.percentage <= 100);
        if reply.progress.stage == last_stage {
            assert!(reply.progress.percentage >= last_progress);
        }
        last_stage = reply.progress.stage;
        last_progress = reply.progress.percentage;

        let session = store.get(id).unwrap();
        assert!(session.roster().active_supporting_count() <= MAX_ACTIVE_SUPPORTING);
        for character in session.roster().debug_state().characters {
            assert!((MIN_TRUST..=MAX_TRUST).contains(&character.trust));
            assert!(character.arc_progress <= 100);
        }
        let context = session.roster().story_context();
        assert_eq!(context, session.roster().story_context());
    }
    assert!(last_stage > Stage::TestsAlliesEnemies);
}

#[tokio::test]
async fn test_narrated_session_sees_story_context() {
    let client = ScriptedClient::new(&[
        "Sure! {\"village_name\": \"broken\"}",
        "Frost covers the square. You can: open the letter or ignore it",
        "The ink burns red. You can: seek the elder or hide the letter",
    ]);
    let mut store = SessionStore::new(EngineConfig::default()).with_client(client.clone());
    let id = store.create();

    let opening = store.start_new_game(id).await.unwrap();
    assert_eq!(opening.response, "Frost covers the square. You can: open the letter or ignore it");
    assert_eq!(opening.progress.actions, vec!["open the letter", "ignore it"]);
    assert_eq!(store.get(id).unwrap().story_elements().village_name, "Willowbrook");

    let reply = store.respond(id, "open the letter").await.unwrap();
    assert_eq!(reply.progress.actions, vec!["seek the elder", "hide the letter"]);

    let prompts = client.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[1].contains("peaceful village of Willowbrook"));
    assert!(prompts[2].contains("Found mysterious letter"));
    assert!(prompts[2].contains("Reveal the initial mystery and its implications"));

    // Script exhausted: the session falls back instead of failing.
    let reply = store.respond(id, "seek the elder").await.unwrap();
    assert!(reply.response.contains("You can:"));
}
