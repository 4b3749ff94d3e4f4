use std::sync::Arc;

use shelf_storage::{ExtensionRepo, RepoStorage, Result};
use tracing::info;

/// Resolves a duplicate fingerprint by swapping the stored repository for the
/// one the user tried to add.
#[derive(Clone)]
pub struct ReplaceExtensionRepo {
    storage: Arc<dyn RepoStorage>,
}

impl ReplaceExtensionRepo {
    pub fn new(storage: Arc<dyn RepoStorage>) -> Self {
        Self { storage }
    }

    pub async fn replace(&self, repo: &ExtensionRepo) -> Result<()> {
        self.storage.replace(repo).await?;
        info!(
            "Repository with fingerprint {} now served from {}",
            repo.fingerprint, repo.base_url
        );
        Ok(())
    }
}
