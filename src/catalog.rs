use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::state::Mood;

const FALLBACK_PET: &str = "cat";

/// Display name and per-mood images for one kind of pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    pub name: String,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

/// The fixed list of pet types the owner can adopt
#[derive(Debug, Clone, PartialEq)]
pub struct PetCatalog {
    pets: BTreeMap<String, PetProfile>,
}

impl PetCatalog {
    /// Load a catalog of the form `{ "cat": { "name": "Cat", "images": { "happy": "..." } } }`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load pet configuration from {}", path.display()))?;
        let pets: BTreeMap<String, PetProfile> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse pet configuration {}", path.display()))?;

        if pets.is_empty() {
            bail!("Pet configuration {} lists no pets", path.display());
        }

        log::info!("Loaded {} pet types from {}", pets.len(), path.display());
        Ok(Self { pets })
    }

    /// Built-in catalog used when no configuration file exists
    pub fn builtin() -> Self {
        let pets = [
            ("cat", "Cat"),
            ("dog", "Dog"),
            ("rabbit", "Rabbit"),
            ("bird", "Bird"),
            ("fish", "Fish"),
            ("hamster", "Hamster"),
        ]
        .into_iter()
        .map(|(key, name)| {
            let images = [Mood::Happy, Mood::Hungry, Mood::Tired, Mood::Sad, Mood::Neutral]
                .into_iter()
                .map(|mood| (mood.to_string(), format!("static/images/{}_{}.png", key, mood)))
                .collect();
            (key.to_string(), PetProfile { name: name.to_string(), images })
        })
        .collect();

        Self { pets }
    }

    /// `(key, display name)` for every pet type
    pub fn available(&self) -> Vec<(&str, &str)> {
        self.pets
            .iter()
            .map(|(key, profile)| (key.as_str(), profile.name.as_str()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&PetProfile> {
        self.resolve_key(key).and_then(|key| self.pets.get(key))
    }

    /// Case-insensitive lookup of the canonical key; display names match too
    pub fn resolve_key(&self, pet_type: &str) -> Option<&str> {
        let wanted = pet_type.trim();
        if wanted.is_empty() {
            return None;
        }

        self.pets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
            .or_else(|| {
                self.pets
                    .iter()
                    .find(|(_, profile)| profile.name.eq_ignore_ascii_case(wanted))
            })
            .map(|(key, _)| key.as_str())
    }

    /// Canonical key for `pet_type`, falling back to the default pet
    pub fn normalize_key(&self, pet_type: &str) -> String {
        match self.resolve_key(pet_type) {
            Some(key) => key.to_string(),
            None => {
                log::warn!("Unknown pet type '{}', using {}", pet_type, FALLBACK_PET);
                FALLBACK_PET.to_string()
            }
        }
    }

    /// Image for `pet_type` in `mood`.
    ///
    /// Unknown moods use the neutral image; unknown types use the cat's
    /// neutral image when the catalog has one.
    pub fn image_path(&self, pet_type: &str, mood: Mood) -> Option<&str> {
        let Some(profile) = self.get(pet_type) else {
            log::error!("Invalid pet type: {}", pet_type);
            return self
                .pets
                .get(FALLBACK_PET)
                .and_then(|cat| cat.images.get(Mood::Neutral.as_str()))
                .map(String::as_str);
        };

        profile
            .images
            .get(mood.as_str())
            .or_else(|| {
                log::warn!("No {} image for {}, using neutral", mood, pet_type);
                profile.images.get(Mood::Neutral.as_str())
            })
            .map(String::as_str)
    }
}

impl Default for PetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
