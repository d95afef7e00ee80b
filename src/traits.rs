use anyhow::Result;
use async_trait::async_trait;

use crate::types::PetSession;

/// Trait for loading and saving the pet between runs
#[async_trait]
pub trait PetStorage: Send + Sync {
    /// Loads the saved session, `None` when there is nothing usable to restore
    async fn load(&self) -> Result<Option<PetSession>>;

    /// Saves the session, stamping its update time
    async fn save(&self, session: &mut PetSession) -> Result<()>;

    /// Forgets the saved session
    async fn reset(&self) -> Result<()>;
}
