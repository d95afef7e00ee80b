use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::sync::Arc;

use crate::llm::{LlmClient, StructuredRequest};
use crate::parser;
use crate::prompts::{PromptBuilder, StoryStarter, STORY_STARTERS};
use crate::state::{Mood, PetState};
use crate::types::{Effect, Pet, PetEvent, PetTip};

/// Generates events, opening stories and tips through the LLM.
///
/// Every generator returns `None` on failure: a missing client, a transport
/// error, unparseable output or an event that fails validation all leave the
/// pet without an event rather than interrupting play.
pub struct EventService {
    llm_client: Option<Arc<dyn LlmClient>>,
    prompt_builder: PromptBuilder,
    rng: StdRng,
}

impl EventService {
    pub fn new(llm_client: Option<Arc<dyn LlmClient>>, prompt_builder: PromptBuilder) -> Self {
        Self {
            llm_client,
            prompt_builder,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn is_llm_available(&self) -> bool {
        self.llm_client.is_some()
    }

    /// Opening story, set at a randomly chosen starter location
    pub async fn generate_story(&mut self, pet: &Pet, state: &PetState, mood: Mood) -> Option<PetEvent> {
        let starter: StoryStarter = *STORY_STARTERS.choose(&mut self.rng)?;
        log::debug!("Opening story for {} starts in {}", pet.name, starter.location);

        let request = self.prompt_builder.build_story_request(pet, state, mood, &starter);
        self.request_event(request, "story").await
    }

    /// Next event given the pet's condition and recent history
    pub async fn generate_event(
        &self,
        pet: &Pet,
        state: &PetState,
        mood: Mood,
        history: &[String],
    ) -> Option<PetEvent> {
        let request = self.prompt_builder.build_event_request(pet, state, mood, history);
        self.request_event(request, "event").await
    }

    pub async fn generate_tip(&self, pet: &Pet, state: &PetState, mood: Mood) -> Option<PetTip> {
        let request = self.prompt_builder.build_tip_request(pet, state, mood);
        match self.query::<PetTip>(&request).await {
            Some(Ok(tip)) => {
                log::info!("💡 Generated tip: {}", tip.tip_title);
                Some(tip)
            }
            Some(Err(e)) => {
                log::error!("Failed to generate tip: {}", e);
                None
            }
            None => None,
        }
    }

    async fn request_event(&self, request: StructuredRequest, kind: &str) -> Option<PetEvent> {
        let event = match self.query::<PetEvent>(&request).await? {
            Ok(event) => event,
            Err(e) => {
                log::error!("Failed to generate {}: {}", kind, e);
                return None;
            }
        };

        match event.validated() {
            Ok(event) => {
                log::info!("🎲 Generated {}: {}", kind, event.title);
                Some(event)
            }
            Err(e) => {
                log::error!("Rejected generated {}: {}", kind, e);
                None
            }
        }
    }

    /// `None` when no client is configured, otherwise the parsed answer
    async fn query<T: serde::de::DeserializeOwned>(&self, request: &StructuredRequest) -> Option<Result<T>> {
        let Some(client) = &self.llm_client else {
            log::warn!("LLM service not available, skipping generation");
            return None;
        };

        log::debug!("Prompt:\n{}", request.user_prompt);
        let result = match client.query(request).await {
            Ok(response) => {
                log::debug!("Response:\n{}", response);
                parser::extract_json::<T>(&response)
            }
            Err(e) => Err(e),
        };
        Some(result)
    }
}

/// Deltas of the chosen option; an index past the options gives no effect
pub fn effects_for_choice(event: &PetEvent, index: usize) -> Effect {
    match event.options.get(index) {
        Some(option) => option.effect,
        None => {
            log::error!(
                "Invalid choice {} for event '{}' with {} options",
                index,
                event.title,
                event.options.len()
            );
            Effect::default()
        }
    }
}
