use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::catalog::PetCatalog;
use crate::config::Config;
use crate::events::{effects_for_choice, EventService};
use crate::llm::LlmClient;
use crate::prompts::PromptBuilder;
use crate::state::{self, Action, Mood, PetState};
use crate::storage::JsonFileStorage;
use crate::traits::PetStorage;
use crate::trigger::EventTrigger;
use crate::types::{EventOption, PetEvent, PetSession, PetTip};

/// What happened when the owner picked an event option
#[derive(Debug, Clone)]
pub struct ChoiceOutcome {
    pub chosen: EventOption,
    pub before: PetState,
    pub after: PetState,
    /// Follow-up event, if the trigger fired and generation succeeded
    pub next_event: Option<PetEvent>,
}

/// Owns the pet session and runs every interaction through
/// mutate, trigger, narrate and save
pub struct PetEngine {
    config: Config,
    catalog: PetCatalog,
    storage: Box<dyn PetStorage>,
    events: EventService,
    trigger: EventTrigger,
    session: PetSession,
}

impl PetEngine {
    /// Create an engine backed by `pet_data.json` in the configured data directory
    pub fn new(config: Config, llm_client: Option<Arc<dyn LlmClient>>) -> Result<Self> {
        let catalog = match config.catalog_file() {
            Some(path) => PetCatalog::load(path)?,
            None => PetCatalog::builtin(),
        };
        let storage = JsonFileStorage::new(config.data_file());
        Ok(Self::with_parts(config, catalog, storage, llm_client))
    }

    pub fn with_parts(
        config: Config,
        catalog: PetCatalog,
        storage: impl PetStorage + 'static,
        llm_client: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let prompt_builder = PromptBuilder::new(
            config.prompts_dir(),
            config.stats.bounds.max,
            config.prompt_history,
        );
        let events = EventService::new(llm_client, prompt_builder);
        let trigger = EventTrigger::new(config.events.clone());

        let mut session = PetSession::new();
        session.pet_state = PetState::initial(&config.stats);

        Self {
            config,
            catalog,
            storage: Box::new(storage),
            events,
            trigger,
            session,
        }
    }

    /// Make dice rolls reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.trigger = EventTrigger::with_seed(self.config.events.clone(), seed);
        self.events = self.events.with_seed(seed);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &PetCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &PetSession {
        &self.session
    }

    pub fn is_adopted(&self) -> bool {
        self.session.setup_complete
    }

    pub fn is_llm_available(&self) -> bool {
        self.events.is_llm_available()
    }

    pub fn current_event(&self) -> Option<&PetEvent> {
        self.session.current_event.as_ref()
    }

    pub fn mood(&self) -> Mood {
        state::determine_mood(&self.session.pet_state, self.config.stats.mood_threshold)
    }

    /// Image for the pet's current mood
    pub fn image_path(&self) -> Option<&str> {
        self.catalog.image_path(&self.session.pet_type, self.mood())
    }

    /// Restore the saved session and apply the decay owed since the last load
    pub async fn load(&mut self) -> Result<()> {
        self.load_at(Utc::now()).await
    }

    pub async fn load_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        let Some(mut session) = self.storage.load().await? else {
            return Ok(());
        };

        session.pet_type = self.catalog.normalize_key(&session.pet_type);
        session.pet_state = session.pet_state.clamped(self.config.stats.bounds);
        session.current_event = session.current_event.and_then(|event| match event.validated() {
            Ok(event) => Some(event),
            Err(e) => {
                log::warn!("Dropping saved event: {}", e);
                None
            }
        });

        if session.setup_complete {
            self.apply_decay(&mut session, now);
        }

        log::info!("🐾 Restored {} the {}", session.pet_name, session.pet_type);
        self.session = session;
        Ok(())
    }

    /// Adopt a new pet and open its story
    pub async fn adopt(&mut self, name: &str, pet_type: &str) -> Result<()> {
        if self.session.setup_complete {
            bail!(
                "You already have {} the {}. Reset first to adopt a new pet.",
                self.session.pet_name,
                self.session.pet_type
            );
        }

        let name = name.trim();
        if name.is_empty() {
            bail!("Your pet needs a name");
        }

        let Some(pet_type) = self.catalog.resolve_key(pet_type).map(str::to_string) else {
            let known: Vec<_> = self.catalog.available().into_iter().map(|(key, _)| key).collect();
            bail!("Unknown pet type '{}'. Choose one of: {}", pet_type, known.join(", "));
        };

        let mut session = PetSession::new();
        session.pet_name = name.to_string();
        session.pet_type = pet_type;
        session.pet_state = PetState::initial(&self.config.stats);
        session.setup_complete = true;
        session.decayed_at = Some(Utc::now());
        self.session = session;

        log::info!("🐾 Adopted {} the {}", self.session.pet_name, self.session.pet_type);

        let pet = self.session.pet();
        let mood = self.mood();
        self.session.current_event = self
            .events
            .generate_story(&pet, &self.session.pet_state, mood)
            .await;

        self.save().await
    }

    /// Feed, play with, or rest the pet; may produce a new event
    pub async fn perform_action(&mut self, action: Action) -> Result<Option<PetEvent>> {
        self.require_adopted()?;
        if let Some(event) = &self.session.current_event {
            bail!("'{}' is still waiting for your choice", event.title);
        }

        self.session.pet_state = state::apply_action(&self.session.pet_state, action, &self.config.stats);
        let entry = format!("{} {}.", self.session.pet_name, action.past_tense());
        self.session.record(entry, self.config.history_limit);
        log::info!("{} -> {:?}, {}", action, self.session.pet_state, self.mood());

        self.session.current_event = self.maybe_generate_event().await;
        self.save().await?;
        Ok(self.session.current_event.clone())
    }

    /// Resolve the pending event with the option at `index` (0-based)
    pub async fn choose_option(&mut self, index: usize) -> Result<ChoiceOutcome> {
        self.require_adopted()?;
        let Some(event) = self.session.current_event.as_ref() else {
            bail!("There is no event to respond to");
        };
        let Some(chosen) = event.options.get(index).cloned() else {
            bail!(
                "Choice {} is out of range, '{}' has {} options",
                index + 1,
                event.title,
                event.options.len()
            );
        };

        let effect = effects_for_choice(event, index);
        let entry = format!("Event: {} - Chose: {}", event.title, chosen.text);

        let before = self.session.pet_state;
        let after = state::apply_effects(&before, &effect, self.config.stats.bounds);
        self.session.pet_state = after;
        self.session.current_event = None;
        self.session.record(entry, self.config.history_limit);
        log::info!("✅ Chose '{}': {:?} -> {:?}", chosen.text, before, after);

        self.session.current_event = self.maybe_generate_event().await;
        self.save().await?;

        Ok(ChoiceOutcome {
            chosen,
            before,
            after,
            next_event: self.session.current_event.clone(),
        })
    }

    /// A pet-care tip for the current pet; not saved
    pub async fn tip(&self) -> Result<Option<PetTip>> {
        self.require_adopted()?;
        let pet = self.session.pet();
        Ok(self.events.generate_tip(&pet, &self.session.pet_state, self.mood()).await)
    }

    /// Delete the save and start over
    pub async fn reset(&mut self) -> Result<()> {
        self.storage.reset().await.context("Failed to reset pet data")?;
        let mut session = PetSession::new();
        session.pet_state = PetState::initial(&self.config.stats);
        self.session = session;
        log::info!("🔄 Pet reset");
        Ok(())
    }

    /// Consume whole decay intervals since `decayed_at`; the remainder
    /// carries over to the next load
    fn apply_decay(&self, session: &mut PetSession, now: DateTime<Utc>) {
        let Some(since) = session.decayed_at.or(session.last_updated) else {
            return;
        };

        let interval = self.config.stats.decay_interval_minutes;
        let ticks = state::decay_ticks((now - since).num_minutes(), interval);
        session.decayed_at = Some(since + Duration::minutes(i64::from(ticks) * interval));

        if ticks > 0 {
            session.pet_state = state::decay(&session.pet_state, ticks, self.config.stats.bounds);
            log::info!(
                "⏳ {} minutes passed, {}'s stats dropped by {}",
                (now - since).num_minutes(),
                session.pet_name,
                ticks
            );
        }
    }

    async fn maybe_generate_event(&mut self) -> Option<PetEvent> {
        let fire = self
            .trigger
            .should_trigger(&self.session.pet_state, &mut self.session.event_cooldown);
        if !fire {
            return None;
        }

        let pet = self.session.pet();
        let mood = self.mood();
        self.events
            .generate_event(&pet, &self.session.pet_state, mood, &self.session.previous_events)
            .await
    }

    async fn save(&mut self) -> Result<()> {
        self.storage.save(&mut self.session).await
    }

    fn require_adopted(&self) -> Result<()> {
        if !self.session.setup_complete {
            bail!("No pet yet. Adopt one first.");
        }
        Ok(())
    }
}
