use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use super::templates::{EVENT_SYSTEM_DEFAULT, STORY_SYSTEM_DEFAULT, TIP_SYSTEM_DEFAULT};

/// Loads system prompts from the filesystem with fallback to defaults
#[derive(Debug, Clone)]
pub struct PromptLoader {
    prompts_dir: PathBuf,
}

impl PromptLoader {
    pub fn new(prompts_dir: impl AsRef<Path>) -> Self {
        Self {
            prompts_dir: prompts_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load_event_system(&self) -> String {
        self.load_or("event_system", EVENT_SYSTEM_DEFAULT)
    }

    pub fn load_story_system(&self) -> String {
        self.load_or("story_system", STORY_SYSTEM_DEFAULT)
    }

    pub fn load_tip_system(&self) -> String {
        self.load_or("tip_system", TIP_SYSTEM_DEFAULT)
    }

    /// Load a custom prompt template
    pub fn load_custom(&self, name: &str) -> Result<String> {
        let path = self.prompts_dir.join(format!("{}.md", name));
        fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read prompt '{}': {}", name, e))
    }

    fn load_or(&self, name: &str, default: &str) -> String {
        let path = self.prompts_dir.join(format!("{}.md", name));
        if !path.exists() {
            return default.to_string();
        }

        match self.load_custom(name) {
            Ok(prompt) if !prompt.trim().is_empty() => {
                log::debug!("Loading {} prompt from: {:?}", name, path);
                prompt
            }
            Ok(_) => {
                log::warn!("Prompt override {:?} is empty, using default", path);
                default.to_string()
            }
            Err(e) => {
                log::warn!("{}, using default", e);
                default.to_string()
            }
        }
    }
}
