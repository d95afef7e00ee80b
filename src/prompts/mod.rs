pub mod builder;
pub mod loader;
pub mod schemas;
pub mod templates;

pub use builder::PromptBuilder;
pub use loader::PromptLoader;
pub use templates::{StoryStarter, STORY_STARTERS};
