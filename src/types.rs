use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::PetState;

/// Largest delta a single event option may apply to one stat
pub const MAX_EFFECT: i32 = 5;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Identity of the pet: what it is called and what kind of animal it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: String,
    pub pet_type: String,
}

impl Pet {
    pub fn new(name: impl Into<String>, pet_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pet_type: pet_type.into(),
        }
    }
}

/// Stat deltas carried by an event option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    pub hunger: i32,
    pub energy: i32,
    pub happiness: i32,
}

impl Effect {
    pub fn new(hunger: i32, energy: i32, happiness: i32) -> Self {
        Self {
            hunger,
            energy,
            happiness,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hunger == 0 && self.energy == 0 && self.happiness == 0
    }

    /// Limit each delta to +/- [`MAX_EFFECT`]
    pub fn clamped(self) -> Self {
        Self {
            hunger: self.hunger.clamp(-MAX_EFFECT, MAX_EFFECT),
            energy: self.energy.clamp(-MAX_EFFECT, MAX_EFFECT),
            happiness: self.happiness.clamp(-MAX_EFFECT, MAX_EFFECT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Random,
    Weather,
    TimeBased,
    StatBased,
    #[serde(other)]
    Other,
}

/// One choice the owner can make in response to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub text: String,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub reasoning: String,
}

/// A narrated scenario generated by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetEvent {
    #[serde(default = "default_event_type")]
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub options: Vec<EventOption>,
}

fn default_event_type() -> EventType {
    EventType::Random
}

impl PetEvent {
    /// Check an LLM-produced event and bring it inside the allowed shape.
    ///
    /// Extra options past [`MAX_OPTIONS`] are dropped and every delta is
    /// clamped. Missing text or too few options rejects the event.
    pub fn validated(mut self) -> Result<Self> {
        if self.title.trim().is_empty() {
            bail!("Event has no title");
        }
        if self.description.trim().is_empty() {
            bail!("Event '{}' has no description", self.title);
        }

        self.options.retain(|option| !option.text.trim().is_empty());
        if self.options.len() < MIN_OPTIONS {
            bail!(
                "Event '{}' has {} usable options, need at least {}",
                self.title,
                self.options.len(),
                MIN_OPTIONS
            );
        }
        if self.options.len() > MAX_OPTIONS {
            log::warn!(
                "Event '{}' offered {} options, keeping the first {}",
                self.title,
                self.options.len(),
                MAX_OPTIONS
            );
            self.options.truncate(MAX_OPTIONS);
        }

        for option in &mut self.options {
            option.effect = option.effect.clamped();
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipRelevance {
    General,
    Hunger,
    Energy,
    Happiness,
}

/// A pet-care tip generated by the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetTip {
    pub tip_title: String,
    pub tip_content: String,
    #[serde(default = "default_relevance")]
    pub relevance: TipRelevance,
}

fn default_relevance() -> TipRelevance {
    TipRelevance::General
}

/// Everything persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetSession {
    #[serde(default)]
    pub pet_name: String,
    #[serde(default = "default_pet_type")]
    pub pet_type: String,
    #[serde(default)]
    pub pet_state: PetState,
    #[serde(default)]
    pub setup_complete: bool,
    #[serde(default)]
    pub current_event: Option<PetEvent>,
    #[serde(default)]
    pub previous_events: Vec<String>,
    /// Interactions left before another event may be rolled
    #[serde(default)]
    pub event_cooldown: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Time up to which decay has been applied; older files fall back to `last_updated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decayed_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_pet_type() -> String {
    "cat".to_string()
}

impl PetSession {
    pub fn new() -> Self {
        Self {
            pet_name: String::new(),
            pet_type: default_pet_type(),
            pet_state: PetState::default(),
            setup_complete: false,
            current_event: None,
            previous_events: Vec::new(),
            event_cooldown: 0,
            last_updated: None,
            decayed_at: None,
        }
    }

    pub fn pet(&self) -> Pet {
        Pet::new(self.pet_name.clone(), self.pet_type.clone())
    }

    /// Append a line to the history, keeping only the newest `limit` lines
    pub fn record(&mut self, entry: impl Into<String>, limit: usize) {
        self.previous_events.push(entry.into());
        if self.previous_events.len() > limit {
            let excess = self.previous_events.len() - limit;
            self.previous_events.drain(..excess);
        }
    }
}

impl Default for PetSession {
    fn default() -> Self {
        Self::new()
    }
}
