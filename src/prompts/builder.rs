use std::path::Path;

use super::loader::PromptLoader;
use super::schemas::{pet_event_schema, pet_tip_schema};
use super::templates::StoryStarter;
use crate::llm::StructuredRequest;
use crate::state::{Mood, PetState};
use crate::types::Pet;

/// Builds structured requests for events, stories and tips
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    loader: PromptLoader,
    /// Top of the stat scale, shown as `n/max`
    stat_max: i32,
    /// History lines quoted in event prompts
    history_window: usize,
}

impl PromptBuilder {
    pub fn new(prompts_dir: impl AsRef<Path>, stat_max: i32, history_window: usize) -> Self {
        Self {
            loader: PromptLoader::new(prompts_dir),
            stat_max,
            history_window,
        }
    }

    /// Request for the next event, given the pet's condition and recent history
    pub fn build_event_request(
        &self,
        pet: &Pet,
        state: &PetState,
        mood: Mood,
        history: &[String],
    ) -> StructuredRequest {
        let mut sections = vec![format!(
            "Generate an event for a {} named {}.",
            pet.pet_type, pet.name
        )];

        sections.push(self.format_condition(state, mood));

        if let Some(history) = self.format_history(history) {
            sections.push(history);
        }

        sections.push("Create an engaging scenario with options for the owner to choose from. Respond in JSON format.".to_string());

        StructuredRequest::new(
            self.loader.load_event_system(),
            sections.join("\n\n---\n\n"),
            pet_event_schema(),
        )
    }

    /// Request for the opening story right after adoption
    pub fn build_story_request(&self, pet: &Pet, state: &PetState, mood: Mood, starter: &StoryStarter) -> StructuredRequest {
        let sections = [
            format!("Generate the opening story for a {} named {}.", pet.pet_type, pet.name),
            format!(
                "## Setting\n\n- Location: {}\n- Scenario: {}",
                starter.location, starter.scenario
            ),
            self.format_condition(state, mood),
            "Create an engaging scenario with 2 options for the owner to choose from. Respond in JSON format.".to_string(),
        ];

        StructuredRequest::new(
            self.loader.load_story_system(),
            sections.join("\n\n---\n\n"),
            pet_event_schema(),
        )
    }

    /// Request for a pet-care tip suited to the pet's condition
    pub fn build_tip_request(&self, pet: &Pet, state: &PetState, mood: Mood) -> StructuredRequest {
        let sections = [
            format!("Share a pet-care tip for a {} named {}.", pet.pet_type, pet.name),
            self.format_condition(state, mood),
        ];

        StructuredRequest::new(
            self.loader.load_tip_system(),
            sections.join("\n\n---\n\n"),
            pet_tip_schema(),
        )
        .with_temperature(0.5)
    }

    fn format_condition(&self, state: &PetState, mood: Mood) -> String {
        format!(
            "## Current State\n\n- Hunger: {}/{}\n- Energy: {}/{}\n- Happiness: {}/{}\n- Current mood: {}",
            state.hunger,
            self.stat_max,
            state.energy,
            self.stat_max,
            state.happiness,
            self.stat_max,
            mood
        )
    }

    fn format_history(&self, history: &[String]) -> Option<String> {
        if history.is_empty() || self.history_window == 0 {
            return None;
        }

        let skip = history.len().saturating_sub(self.history_window);
        let mut text = String::from("## Recent History\n\n");
        if skip > 0 {
            text.push_str(&format!("({} earlier moments not shown)\n", skip));
        }
        for entry in &history[skip..] {
            text.push_str(&format!("- {}\n", entry));
        }
        Some(text)
    }
}
