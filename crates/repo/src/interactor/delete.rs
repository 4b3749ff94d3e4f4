use std::sync::Arc;

use shelf_storage::{RepoStorage, Result};
use tracing::{debug, info};

#[derive(Clone)]
pub struct DeleteExtensionRepo {
    storage: Arc<dyn RepoStorage>,
}

impl DeleteExtensionRepo {
    pub fn new(storage: Arc<dyn RepoStorage>) -> Self {
        Self { storage }
    }

    /// Remove the repository with `base_url`. Absent repositories are ignored.
    pub async fn delete(&self, base_url: &str) -> Result<()> {
        if self.storage.delete(base_url).await? {
            info!("Removed repository {}", base_url);
        } else {
            debug!("Repository {} was not registered", base_url);
        }
        Ok(())
    }
}
