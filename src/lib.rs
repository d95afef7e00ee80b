//! # Virtual Pet
//!
//! A virtual pet whose hunger, energy and happiness move with the owner's
//! actions, with occasional events narrated by an LLM.
//!
//! ## Features
//!
//! - **Pet State**: Bounded stats, mood derived from thresholds, time decay
//! - **Event Trigger**: Cooldown and probability gate deciding when to call the model
//! - **Event Generation**: Schema-constrained JSON events whose option effects apply back onto the pet
//! - **Persistence**: The whole session in one JSON file
//! - **LLM Integration**: Built-in OpenAI chat-completions client with retries
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use virtual_pet::{Action, Config, PetEngine, llm::{LlmClient, OpenAiClient}};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::new(None)?;
//! let llm = OpenAiClient::from_settings(&config.llm)?.map(|c| Arc::new(c) as Arc<dyn LlmClient>);
//! let mut engine = PetEngine::new(config, llm)?;
//! engine.load().await?;
//!
//! if !engine.is_adopted() {
//!     engine.adopt("Whiskers", "cat").await?;
//! }
//! if let Some(event) = engine.current_event() {
//!     println!("{}", event.description);
//!     engine.choose_option(0).await?;
//! } else {
//!     engine.perform_action(Action::Feed).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod display;
pub mod engine;
pub mod events;
pub mod llm;
pub mod names;
pub mod parser;
pub mod prompts;
pub mod state;
pub mod storage;
pub mod traits;
pub mod trigger;
pub mod types;

// Re-export main types for convenience
pub use catalog::{PetCatalog, PetProfile};
pub use config::{Config, EventSettings, LlmSettings};
pub use engine::{ChoiceOutcome, PetEngine};
pub use events::EventService;
pub use state::{Action, Mood, PetState, StatBounds, StatRules};
pub use storage::JsonFileStorage;
pub use traits::PetStorage;
pub use trigger::EventTrigger;
pub use types::{Effect, EventOption, EventType, Pet, PetEvent, PetSession, PetTip, TipRelevance};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
