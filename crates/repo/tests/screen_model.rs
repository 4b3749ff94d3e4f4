//! Repository list screen controller

mod common;

use std::sync::Arc;

use common::{FailingStorage, FakeRepoApi, InsertFailure, interactors};
use shelf_repo::{ExtensionReposModel, RepoDialog, RepoEvent, RepoScreenState};
use shelf_storage::{ExtensionRepo, MemoryRepoStorage, RepoStorage};

async fn loaded(model: &ExtensionReposModel) -> RepoScreenState {
    let mut state = model.state();
    let loaded = state.wait_for(|s| s.is_loaded()).await.unwrap().clone();
    loaded
}

/// Wait for the list to reach `len` entries.
async fn wait_for_len(model: &ExtensionReposModel, len: usize) -> RepoScreenState {
    let mut state = model.state();
    let reached = state
        .wait_for(|s| s.repos().is_some_and(|r| r.len() == len))
        .await
        .unwrap()
        .clone();
    reached
}

#[tokio::test]
async fn test_starts_loading_then_follows_storage() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    let (model, _events) = ExtensionReposModel::new(interactors(storage.clone(), api));

    let state = loaded(&model).await;
    assert!(state.is_empty());

    storage
        .insert(&ExtensionRepo::new(
            "https://elsewhere.example.com",
            "Elsewhere",
            None,
            "https://elsewhere",
            "key",
        ))
        .await
        .unwrap();

    let state = wait_for_len(&model, 1).await;
    assert_eq!(state.repos().unwrap()[0].name, "Elsewhere");
}

#[tokio::test]
async fn test_create_adds_repo_to_list() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://example.com", "X", "abc");
    let (model, mut events) = ExtensionReposModel::new(interactors(storage, api));
    loaded(&model).await;

    model.create_repo("https://example.com/index.min.json");
    model.settle().await;

    let state = wait_for_len(&model, 1).await;
    assert_eq!(state.repos().unwrap()[0].base_url, "https://example.com");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_invalid_url_emits_event_once() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    let (model, mut events) = ExtensionReposModel::new(interactors(storage, api.clone()));
    loaded(&model).await;

    model.create_repo("ftp://example.com/index.min.json");
    model.settle().await;

    assert_eq!(events.recv().await, Some(RepoEvent::InvalidUrl));
    assert!(events.try_recv().is_err());
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_duplicate_fingerprint_opens_conflict_dialog() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://one.example.com", "One", "shared");
    api.serve_repo("https://two.example.com", "Two", "shared");
    let (model, mut events) = ExtensionReposModel::new(interactors(storage.clone(), api));
    loaded(&model).await;

    model.create_repo("https://one.example.com/index.min.json");
    model.settle().await;
    wait_for_len(&model, 1).await;

    model.create_repo("https://two.example.com/index.min.json");
    model.settle().await;

    let Some(RepoDialog::Conflict { existing, attempted }) = model.current_state().dialog().cloned()
    else {
        panic!("expected conflict dialog");
    };
    assert_eq!(existing.base_url, "https://one.example.com");
    assert_eq!(attempted.base_url, "https://two.example.com");
    assert!(events.try_recv().is_err());

    model.replace_repo(attempted);
    model.settle().await;

    let mut state = model.state();
    let state = state
        .wait_for(|s| {
            s.repos()
                .is_some_and(|r| r.len() == 1 && r[0].base_url == "https://two.example.com")
        })
        .await
        .unwrap()
        .clone();
    assert_eq!(state.dialog(), None);
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_existing_repo_emits_already_exists() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://example.com", "X", "abc");
    let (model, mut events) = ExtensionReposModel::new(interactors(storage, api));
    loaded(&model).await;

    model.create_repo("https://example.com/index.min.json");
    model.settle().await;
    model.create_repo("https://example.com/index.min.json");
    model.settle().await;

    assert_eq!(events.recv().await, Some(RepoEvent::RepoAlreadyExists));
}

#[tokio::test]
async fn test_dialogs_survive_list_updates() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://example.com", "X", "abc");
    let (model, _events) = ExtensionReposModel::new(interactors(storage, api));
    loaded(&model).await;

    model.show_dialog(RepoDialog::Create);
    model.create_repo("https://example.com/index.min.json");
    model.settle().await;

    let state = wait_for_len(&model, 1).await;
    assert_eq!(state.dialog(), Some(&RepoDialog::Create));

    model.show_dialog(RepoDialog::Delete("https://example.com".to_string()));
    assert_eq!(
        model.current_state().dialog(),
        Some(&RepoDialog::Delete("https://example.com".to_string()))
    );

    model.dismiss_dialog();
    assert_eq!(model.current_state().dialog(), None);
}

#[tokio::test]
async fn test_dialog_commands_ignored_while_loading() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    let (model, _events) = ExtensionReposModel::new(interactors(storage, api));

    // The subscription task has not run yet on the current-thread runtime.
    assert_eq!(model.current_state(), RepoScreenState::Loading);
    model.show_dialog(RepoDialog::Create);
    model.dismiss_dialog();
    model.refresh_repos();

    assert_eq!(model.current_state(), RepoScreenState::Loading);
    assert!(loaded(&model).await.dialog().is_none());
}

#[tokio::test]
async fn test_delete_missing_repo_is_silent() {
    let storage = Arc::new(MemoryRepoStorage::new());
    let api = Arc::new(FakeRepoApi::new());
    let (model, mut events) = ExtensionReposModel::new(interactors(storage, api));
    loaded(&model).await;

    model.delete_repo("https://never.added");
    model.settle().await;

    assert!(events.try_recv().is_err());
    assert!(model.current_state().is_empty());
}

#[tokio::test]
async fn test_refresh_isolates_failures_and_reports_them() {
    let storage = Arc::new(MemoryRepoStorage::with_repos(vec![
        ExtensionRepo::new("https://a.example.com", "A", None, "https://a.example.org", "key-a"),
        ExtensionRepo::new("https://b.example.com", "B", None, "https://b.example.org", "key-b"),
    ]).unwrap());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://a.example.com", "A2", "key-a");
    let (model, mut events) = ExtensionReposModel::new(interactors(storage.clone(), api));
    loaded(&model).await;

    model.refresh_repos();
    model.settle().await;

    assert_eq!(events.recv().await, Some(RepoEvent::InvalidUrl));
    assert!(events.try_recv().is_err());
    let a = storage
        .get_by_base_url("https://a.example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.name, "A2");
    assert_eq!(storage.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_twice_gives_same_list() {
    let storage = Arc::new(MemoryRepoStorage::with_repos(vec![ExtensionRepo::new(
        "https://a.example.com",
        "A",
        None,
        "https://a.example.org",
        "key-a",
    )]).unwrap());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://a.example.com", "A2", "key-a");
    let (model, _events) = ExtensionReposModel::new(interactors(storage.clone(), api));
    loaded(&model).await;

    model.refresh_repos();
    model.settle().await;
    let first = storage.list().await.unwrap();

    model.refresh_repos();
    model.settle().await;
    let second = storage.list().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].name, "A2");
}

#[tokio::test]
async fn test_fingerprint_change_is_reported() {
    let storage = Arc::new(MemoryRepoStorage::with_repos(vec![ExtensionRepo::new(
        "https://a.example.com",
        "A",
        None,
        "https://a.example.org",
        "key-a",
    )]).unwrap());
    let api = Arc::new(FakeRepoApi::new());
    api.serve_repo("https://a.example.com", "A", "other-key");
    let (model, mut events) = ExtensionReposModel::new(interactors(storage, api));
    loaded(&model).await;

    model.refresh_repos();
    model.settle().await;

    assert_eq!(
        events.recv().await,
        Some(RepoEvent::FingerprintMismatch {
            base_url: "https://a.example.com".to_string()
        })
    );
}

#[tokio::test]
async fn test_storage_failure_is_reported() {
    for failure in [InsertFailure::UnexplainedConflict, InsertFailure::Backend] {
        let storage = Arc::new(FailingStorage::new(failure));
        let api = Arc::new(FakeRepoApi::new());
        api.serve_repo("https://example.com", "X", "abc");
        let (model, mut events) = ExtensionReposModel::new(interactors(storage, api));
        loaded(&model).await;

        model.create_repo("https://example.com/index.min.json");
        model.settle().await;

        assert_eq!(events.recv().await, Some(RepoEvent::Failed));
        assert_eq!(model.current_state().dialog(), None);
        assert!(model.current_state().is_empty());
    }
}
