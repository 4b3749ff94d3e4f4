use std::sync::Arc;

use shelf_storage::{RepoStorage, Result};

#[derive(Clone)]
pub struct GetExtensionRepoCount {
    storage: Arc<dyn RepoStorage>,
}

impl GetExtensionRepoCount {
    pub fn new(storage: Arc<dyn RepoStorage>) -> Self {
        Self { storage }
    }

    pub async fn count(&self) -> Result<usize> {
        self.storage.count().await
    }
}
