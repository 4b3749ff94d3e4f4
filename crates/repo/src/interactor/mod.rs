//! Use cases over the stored repository list.
//!
//! Each interactor owns handles to the storage and, where it needs one, the
//! manifest api. They are cheap to clone.

mod count;
mod create;
mod delete;
mod get;
mod replace;
mod update;

use std::sync::Arc;

use shelf_storage::RepoStorage;

use crate::api::RepoApi;

pub use count::GetExtensionRepoCount;
pub use create::{CreateExtensionRepo, CreateRepoResult};
pub use delete::DeleteExtensionRepo;
pub use get::GetExtensionRepo;
pub use replace::ReplaceExtensionRepo;
pub use update::{RefreshOutcome, UpdateExtensionRepo};

/// Every interactor, wired to the same storage and api.
#[derive(Clone)]
pub struct RepoInteractors {
    pub create: CreateExtensionRepo,
    pub delete: DeleteExtensionRepo,
    pub get: GetExtensionRepo,
    pub count: GetExtensionRepoCount,
    pub replace: ReplaceExtensionRepo,
    pub update: UpdateExtensionRepo,
}

impl RepoInteractors {
    pub fn new(storage: Arc<dyn RepoStorage>, api: Arc<dyn RepoApi>) -> Self {
        Self {
            create: CreateExtensionRepo::new(storage.clone(), api.clone()),
            delete: DeleteExtensionRepo::new(storage.clone()),
            get: GetExtensionRepo::new(storage.clone()),
            count: GetExtensionRepoCount::new(storage.clone()),
            replace: ReplaceExtensionRepo::new(storage.clone()),
            update: UpdateExtensionRepo::new(storage, api),
        }
    }
}
