use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use virtual_pet::llm::{LlmClient, StructuredRequest};
use virtual_pet::{
    Action, Config, EventSettings, JsonFileStorage, Mood, PetCatalog, PetEngine, PetState,
    PetStorage, StatBounds,
};

/// Replies with queued responses in order; errors once the queue is empty
struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn query(&self, request: &StructuredRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.user_prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("script exhausted"))
    }
}

fn event_json(title: &str, effects: [(i32, i32, i32); 2]) -> String {
    format!(
        r#"{{
            "event_type": "stat_based",
            "title": "{title}",
            "description": "Something happens to your pet.",
            "options": [
                {{"text": "First", "effect": {{"hunger": {}, "energy": {}, "happiness": {}}}, "reasoning": "a"}},
                {{"text": "Second", "effect": {{"hunger": {}, "energy": {}, "happiness": {}}}, "reasoning": "b"}}
            ]
        }}"#,
        effects[0].0, effects[0].1, effects[0].2, effects[1].0, effects[1].1, effects[1].2
    )
}

fn always() -> EventSettings {
    EventSettings {
        always_trigger: true,
        ..EventSettings::default()
    }
}

fn never() -> EventSettings {
    EventSettings {
        chance_normal: 0.0,
        chance_critical: 0.0,
        ..EventSettings::default()
    }
}

fn engine_with(
    dir: &tempfile::TempDir,
    events: EventSettings,
    client: Option<Arc<ScriptedClient>>,
) -> PetEngine {
    let mut config = Config::in_dir(dir.path());
    config.events = events;
    let storage = JsonFileStorage::new(config.data_file());
    let client = client.map(|c| c as Arc<dyn LlmClient>);
    PetEngine::with_parts(config, PetCatalog::builtin(), storage, client).with_seed(5)
}

#[tokio::test]
async fn adopt_generates_opening_story_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let story = event_json("A New Home", [(1, 0, 2), (0, 1, 0)]);
    let client = ScriptedClient::new(&[&story]);
    let mut engine = engine_with(&dir, never(), Some(client.clone()));

    engine.adopt("  Mochi ", "Rabbit").await.unwrap();

    assert!(engine.is_adopted());
    assert_eq!(engine.session().pet_name, "Mochi");
    assert_eq!(engine.session().pet_type, "rabbit");
    assert_eq!(engine.session().pet_state, PetState::new(5, 5, 5));
    assert_eq!(engine.current_event().unwrap().title, "A New Home");
    assert!(client.last_prompt().contains("opening story for a rabbit named Mochi"));

    let saved = JsonFileStorage::new(dir.path().join("pet_data.json"))
        .load()
        .await
        .unwrap()
        .unwrap();
    assert!(saved.setup_complete);
    assert_eq!(saved.current_event.unwrap().title, "A New Home");
}

#[tokio::test]
async fn adopt_validates_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_with(&dir, never(), None);

    assert!(engine.adopt("   ", "cat").await.is_err());
    assert!(engine.adopt("Smaug", "dragon").await.is_err());
    assert!(!engine.is_adopted());

    engine.adopt("Rex", "dog").await.unwrap();
    assert!(engine.adopt("Rex II", "dog").await.is_err());
}

#[tokio::test]
async fn actions_without_llm_still_update_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_with(&dir, always(), None);
    engine.adopt("Luna", "cat").await.unwrap();
    assert!(engine.current_event().is_none());

    let event = engine.perform_action(Action::Play).await.unwrap();
    assert!(event.is_none());
    assert_eq!(engine.session().pet_state, PetState::new(4, 4, 7));

    engine.perform_action(Action::Feed).await.unwrap();
    engine.perform_action(Action::Rest).await.unwrap();
    assert_eq!(engine.session().pet_state, PetState::new(6, 6, 7));
    assert_eq!(
        engine.session().previous_events,
        vec!["Luna was played with.", "Luna was fed.", "Luna rested."]
    );
}

#[tokio::test]
async fn actions_are_refused_while_an_event_is_pending() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(&[&event_json("Puddle", [(0, -1, 2), (0, 0, 0)])]);
    let mut engine = engine_with(&dir, always(), Some(client));

    assert!(engine.perform_action(Action::Feed).await.is_err());
    engine.adopt("Rex", "dog").await.unwrap();
    assert!(engine.current_event().is_some());
    assert!(engine.perform_action(Action::Feed).await.is_err());
}

#[tokio::test]
async fn choosing_applies_effects_and_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(&[
        &event_json("Picnic", [(9, -2, 3), (0, 0, 0)]),
        &event_json("Butterfly", [(0, 0, 1), (0, 0, -1)]),
    ]);
    let mut engine = engine_with(&dir, always(), Some(client.clone()));
    engine.adopt("Biscuit", "hamster").await.unwrap();

    // Out of range keeps the event
    assert!(engine.choose_option(2).await.is_err());
    assert_eq!(engine.current_event().unwrap().title, "Picnic");

    let outcome = engine.choose_option(0).await.unwrap();
    assert_eq!(outcome.chosen.text, "First");
    // Hunger delta 9 is clamped to 5 when the event is validated
    assert_eq!(outcome.before, PetState::new(5, 5, 5));
    assert_eq!(outcome.after, PetState::new(10, 3, 8));
    assert_eq!(outcome.next_event.unwrap().title, "Butterfly");
    assert_eq!(engine.session().previous_events, vec!["Event: Picnic - Chose: First"]);

    let prompt = client.last_prompt();
    assert!(prompt.contains("- Hunger: 10/10"));
    assert!(prompt.contains("- Event: Picnic - Chose: First"));
}

#[tokio::test]
async fn failed_generation_clears_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(&[
        &event_json("Walk", [(0, -1, 1), (0, 1, 0)]),
        "the model rambled instead of answering",
    ]);
    let mut engine = engine_with(&dir, always(), Some(client.clone()));
    engine.adopt("Rex", "dog").await.unwrap();

    let outcome = engine.choose_option(1).await.unwrap();
    assert!(outcome.next_event.is_none());
    assert!(engine.current_event().is_none());
    assert_eq!(client.prompt_count(), 2);

    // With no pending event the owner can act again
    engine.perform_action(Action::Feed).await.unwrap();
}

#[tokio::test]
async fn cooldown_is_persisted_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let certain = EventSettings {
        chance_normal: 1.0,
        chance_critical: 1.0,
        ..EventSettings::default()
    };
    let client = ScriptedClient::new(&[
        &event_json("Opening", [(0, 0, 1), (0, 0, 0)]),
        &event_json("Surprise", [(0, 0, 1), (0, 0, 0)]),
    ]);

    let mut engine = engine_with(&dir, certain.clone(), Some(client.clone()));
    engine.adopt("Kiwi", "bird").await.unwrap();
    engine.choose_option(0).await.unwrap();
    let cooldown = engine.session().event_cooldown;
    assert!((3..=5).contains(&cooldown));
    assert_eq!(engine.current_event().unwrap().title, "Surprise");

    // Answering counts as an interaction and burns one cooldown step
    engine.choose_option(0).await.unwrap();
    assert_eq!(engine.session().event_cooldown, cooldown - 1);
    assert!(engine.current_event().is_none());

    let mut reloaded = engine_with(&dir, certain, Some(client.clone()));
    reloaded.load().await.unwrap();
    assert_eq!(reloaded.session().event_cooldown, cooldown - 1);

    reloaded.perform_action(Action::Rest).await.unwrap();
    assert_eq!(reloaded.session().event_cooldown, cooldown - 2);
    assert!(reloaded.current_event().is_none());
    assert_eq!(client.prompt_count(), 2);
}

#[tokio::test]
async fn load_applies_time_decay() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_with(&dir, never(), None);
    engine.adopt("Nemo", "fish").await.unwrap();
    engine.perform_action(Action::Feed).await.unwrap();
    let saved_at = engine.session().decayed_at.unwrap();

    let mut later = engine_with(&dir, never(), None);
    later.load_at(saved_at + Duration::minutes(150)).await.unwrap();
    assert_eq!(later.session().pet_state, PetState::new(5, 3, 3));

    let mut much_later = engine_with(&dir, never(), None);
    much_later.load_at(saved_at + Duration::days(3)).await.unwrap();
    assert_eq!(much_later.session().pet_state, PetState::new(1, 1, 1));
    assert_eq!(much_later.mood(), Mood::Hungry);
}

#[tokio::test]
async fn frequent_check_ins_still_decay() {
    let dir = tempfile::tempdir().unwrap();
    let config = || {
        let mut config = Config::in_dir(dir.path());
        config.events = never();
        config.stats.bounds = StatBounds::new(1, 20);
        config.stats.initial = 15;
        config
    };
    let open = || {
        let config = config();
        let storage = JsonFileStorage::new(config.data_file());
        PetEngine::with_parts(config, PetCatalog::builtin(), storage, None)
    };

    let mut engine = open();
    engine.adopt("Pip", "bird").await.unwrap();
    let adopted_at = engine.session().decayed_at.unwrap();

    // Resting only touches energy, so hunger and happiness show the decay alone
    for check_in in 1..=10 {
        let mut engine = open();
        engine
            .load_at(adopted_at + Duration::minutes(59 * check_in))
            .await
            .unwrap();
        engine.perform_action(Action::Rest).await.unwrap();
    }

    let mut engine = open();
    engine.load_at(adopted_at + Duration::minutes(590)).await.unwrap();
    assert_eq!(engine.session().pet_state.hunger, 15 - 9);
    assert_eq!(engine.session().pet_state.happiness, 15 - 9);
    assert_eq!(
        engine.session().decayed_at,
        Some(adopted_at + Duration::minutes(540))
    );
}

#[tokio::test]
async fn broken_saved_events_are_dropped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let write_session = |event: &str| {
        std::fs::write(
            dir.path().join("pet_data.json"),
            format!(
                r#"{{
                    "pet_name": "Bolt",
                    "pet_type": "dog",
                    "pet_state": {{"hunger": 5, "energy": 5, "happiness": 5}},
                    "setup_complete": true,
                    "current_event": {event},
                    "last_updated": "{}"
                }}"#,
                Utc::now().to_rfc3339()
            ),
        )
        .unwrap();
    };

    // No options would leave the owner unable to act or choose
    write_session(r#"{"title": "Broken", "description": "Nothing to pick.", "options": []}"#);
    let mut engine = engine_with(&dir, never(), None);
    engine.load().await.unwrap();
    assert!(engine.current_event().is_none());
    engine.perform_action(Action::Feed).await.unwrap();
    assert_eq!(engine.session().pet_state.hunger, 7);

    // Oversized deltas are cut back to the usual limit
    write_session(
        r#"{"title": "Feast", "description": "A mountain of treats.", "options": [
            {"text": "Eat it all", "effect": {"hunger": 2147483647, "energy": -2147483648}},
            {"text": "Walk away"}
        ]}"#,
    );
    let mut engine = engine_with(&dir, never(), None);
    engine.load().await.unwrap();
    assert_eq!(engine.current_event().unwrap().options[0].effect.hunger, 5);

    let outcome = engine.choose_option(0).await.unwrap();
    assert_eq!(outcome.after, PetState::new(10, 1, 5));
}

#[tokio::test]
async fn load_normalizes_pet_type_and_clamps_stats() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pet_data.json"),
        format!(
            r#"{{
                "pet_name": "Zed",
                "pet_type": "DRAGON",
                "pet_state": {{"hunger": 40, "energy": 0, "happiness": 7, "mood": "happy"}},
                "setup_complete": true,
                "previous_events": [],
                "last_updated": "{}"
            }}"#,
            Utc::now().to_rfc3339()
        ),
    )
    .unwrap();

    let mut engine = engine_with(&dir, never(), None);
    engine.load().await.unwrap();

    assert_eq!(engine.session().pet_type, "cat");
    assert_eq!(engine.session().pet_state, PetState::new(10, 1, 7));
    assert_eq!(engine.mood(), Mood::Tired);
    assert_eq!(engine.image_path(), Some("static/images/cat_tired.png"));
}

#[tokio::test]
async fn reset_forgets_the_pet() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_with(&dir, never(), None);
    engine.adopt("Luna", "cat").await.unwrap();
    assert!(dir.path().join("pet_data.json").exists());

    engine.reset().await.unwrap();
    assert!(!engine.is_adopted());
    assert!(!dir.path().join("pet_data.json").exists());

    engine.adopt("Nova", "dog").await.unwrap();
    assert_eq!(engine.session().pet_name, "Nova");
}

#[tokio::test]
async fn tip_requires_a_pet() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(&[
        &event_json("Opening", [(0, 0, 1), (0, 0, 0)]),
        r#"{"tip_title": "Hydration", "tip_content": "Keep the water fresh.", "relevance": "general"}"#,
    ]);
    let mut engine = engine_with(&dir, never(), Some(client.clone()));

    assert!(engine.tip().await.is_err());
    assert_eq!(client.prompt_count(), 0);

    engine.adopt("Luna", "cat").await.unwrap();
    let tip = engine.tip().await.unwrap().unwrap();
    assert_eq!(tip.tip_title, "Hydration");
    assert!(client.last_prompt().contains("pet-care tip for a cat named Luna"));

    // Script exhausted: the tip falls back to nothing
    assert!(engine.tip().await.unwrap().is_none());
}
