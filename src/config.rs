use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::state::StatRules;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "pet_data.json";
const CATALOG_FILE: &str = "pet_config.json";

/// Application configuration, stored as `config.json` in the data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub llm: LlmSettings,
    pub stats: StatRules,
    pub events: EventSettings,
    /// Number of history lines kept in the save file
    pub history_limit: usize,
    /// Number of history lines quoted in event prompts
    pub prompt_history: usize,
    /// Explicit pet catalog; defaults to `pet_config.json` in the data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            max_attempts: 3,
        }
    }
}

/// When events fire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub cooldown_min: u32,
    pub cooldown_max: u32,
    pub chance_normal: f64,
    pub chance_critical: f64,
    pub critical_threshold: i32,
    /// Skip the cooldown and dice and generate after every interaction
    pub always_trigger: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            cooldown_min: 3,
            cooldown_max: 5,
            chance_normal: 0.2,
            chance_critical: 0.4,
            critical_threshold: 3,
            always_trigger: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            llm: LlmSettings::default(),
            stats: StatRules::default(),
            events: EventSettings::default(),
            history_limit: 15,
            prompt_history: 10,
            pet_config: None,
        }
    }
}

/// `<platform data dir>/virtual-pet`, or the working directory as a last resort
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("virtual-pet")
}

impl Config {
    /// Load the configuration from `data_dir`, writing defaults on first run,
    /// then apply environment overrides
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config_path = data_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            if content.trim().is_empty() {
                log::warn!("{} is empty, using defaults", config_path.display());
                Config::default()
            } else {
                serde_json::from_str::<Config>(&content)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?
            }
        } else {
            let config = Config::default();
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config")?;
            std::fs::write(&config_path, json)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            log::info!("Wrote default configuration to {}", config_path.display());
            config
        };

        config.data_dir = data_dir;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults rooted at `data_dir`, without touching the disk or environment
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Config::default()
        }
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("VIRTUAL_PET_MODEL") {
            if !model.trim().is_empty() {
                self.llm.model = model;
            }
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            if !url.trim().is_empty() {
                self.llm.base_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = self.stats.bounds;
        if !bounds.is_valid() {
            bail!(
                "Stat bounds {}..={} must be a non-empty range inside 0..=100",
                bounds.min,
                bounds.max
            );
        }
        if self.events.cooldown_min > self.events.cooldown_max {
            bail!(
                "Event cooldown_min ({}) is larger than cooldown_max ({})",
                self.events.cooldown_min,
                self.events.cooldown_max
            );
        }
        for chance in [self.events.chance_normal, self.events.chance_critical] {
            if !(0.0..=1.0).contains(&chance) {
                bail!("Event chance {} is outside 0.0..=1.0", chance);
            }
        }
        if self.history_limit == 0 {
            bail!("history_limit must be at least 1");
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let path = self.data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE)
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.data_dir.join("prompts")
    }

    /// Catalog file to load, if one is configured or present in the data dir
    pub fn catalog_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.pet_config {
            return Some(path.clone());
        }
        let path = self.data_dir.join(CATALOG_FILE);
        path.exists().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(!config.llm.model.is_empty());
        assert_eq!(config.history_limit, 15);
        let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(written.contains("cooldown_min"));
        assert!(!written.contains("api_key"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"events": {"always_trigger": true}, "history_limit": 5}"#,
        )
        .unwrap();

        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(config.events.always_trigger);
        assert_eq!(config.events.cooldown_max, 5);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.stats.initial, 5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"events": {"cooldown_min": 6, "cooldown_max": 2}}"#,
        )
        .unwrap();
        assert!(Config::new(Some(dir.path().to_path_buf())).is_err());

        let mut config = Config::in_dir(dir.path());
        config.stats.bounds.max = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_file_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(dir.path());
        assert!(config.catalog_file().is_none());

        std::fs::write(dir.path().join(CATALOG_FILE), "{}").unwrap();
        assert_eq!(config.catalog_file(), Some(dir.path().join(CATALOG_FILE)));
    }
}
