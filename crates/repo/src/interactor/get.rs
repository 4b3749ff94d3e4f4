use std::sync::Arc;

use shelf_storage::{RepoSnapshot, RepoStorage, Result};
use tokio::sync::watch;

#[derive(Clone)]
pub struct GetExtensionRepo {
    storage: Arc<dyn RepoStorage>,
}

impl GetExtensionRepo {
    pub fn new(storage: Arc<dyn RepoStorage>) -> Self {
        Self { storage }
    }

    pub fn subscribe_all(&self) -> watch::Receiver<RepoSnapshot> {
        self.storage.subscribe()
    }

    pub async fn get_all(&self) -> Result<RepoSnapshot> {
        self.storage.list().await
    }
}
