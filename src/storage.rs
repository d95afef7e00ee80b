use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::traits::PetStorage;
use crate::types::PetSession;

/// Keeps the session in a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PetStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<PetSession>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No saved pet data found. Starting with a new pet.");
                return Ok(None);
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<PetSession>(&content) {
            Ok(session) => {
                log::debug!("Loaded pet data from {}", self.path.display());
                Ok(Some(session))
            }
            Err(e) => {
                log::error!("Failed to parse {}: {}. Starting fresh.", self.path.display(), e);
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &mut PetSession) -> Result<()> {
        session.last_updated = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(session).context("Failed to serialize pet data")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        log::debug!("Saved pet data to {}", self.path.display());
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                log::info!("Deleted {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to reset pet data at {}", self.path.display())),
        }
    }
}
