use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use notodash_core::{BuildResult, PersistedState};
use notodash_http::{HttpClient, HttpClientTrait, HttpConfig, HttpError, Response};
use notodash_storage::{StateStore, StorageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> Arc<dyn HttpClientTrait> {
    Arc::new(
        HttpClient::new(
            HttpConfig::new()
                .with_retry_count(0)
                .with_retry_delay(Duration::from_millis(5)),
        )
        .unwrap(),
    )
}

fn known_state() -> PersistedState {
    let mut state = PersistedState::new();
    state.record(
        BuildResult::new("Noto Sans Adlam")
            .with_fingerprint(Some("1a2b3c4 (Add marks, 2024-02-02)".to_string()))
            .with_outputs(["Noto Sans Adlam/unhinted/ttf/NotoSansAdlam-Regular.ttf"]),
    );
    state.record(BuildResult::new("Noto Serif Tamil").with_error("boom"));
    state
}

/// Client that always fails without touching the network
struct Unreachable;

#[async_trait]
impl HttpClientTrait for Unreachable {
    async fn get(&self, _url: &str) -> notodash_http::Result<Response> {
        Err(HttpError::Timeout(Duration::from_secs(30)))
    }
}

#[tokio::test]
async fn test_remote_snapshot_is_loaded() {
    let server = MockServer::start().await;
    let body = known_state().to_json_pretty().unwrap();
    Mock::given(method("GET"))
        .and(path("/state.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::local(dir.path().join("state.json"))
        .with_remote(format!("{}/state.json", server.uri()), http());

    assert_eq!(store.load().await, known_state());
}

#[tokio::test]
async fn test_remote_snapshot_preferred_over_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/state.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"projects": {}}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let local = StateStore::local(dir.path().join("state.json"));
    local.persist(&known_state()).await.unwrap();

    let store = StateStore::local(dir.path().join("state.json"))
        .with_remote(format!("{}/state.json", server.uri()), http());
    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn test_missing_remote_snapshot_yields_empty_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/state.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::local(dir.path().join("state.json"))
        .with_remote(format!("{}/state.json", server.uri()), http());

    assert!(store.load().await.is_empty());
    assert!(matches!(
        store.try_load().await,
        Err(StorageError::SnapshotUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_remote_yields_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::local(dir.path().join("state.json"))
        .with_remote("https://snapshots.invalid/state.json", Arc::new(Unreachable));

    assert!(store.load().await.is_empty());
}

#[tokio::test]
async fn test_partially_corrupt_remote_snapshot() {
    let server = MockServer::start().await;
    let body = r#"{"projects": {
        "Noto Sans Adlam": {"family": "Noto Sans Adlam", "commit": "abc", "log": "Noto Sans Adlam/build.log",
                            "errors": null, "fontbakery": null},
        "Noto Serif Tamil": "garbage"
    }}"#;
    Mock::given(method("GET"))
        .and(path("/state.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::local(dir.path().join("state.json"))
        .with_remote(format!("{}/state.json", server.uri()), http());

    let state = store.load().await;
    assert_eq!(
        state.families().collect::<Vec<_>>(),
        vec!["Noto Sans Adlam", "Noto Serif Tamil"]
    );
    assert!(state.get("Noto Serif Tamil").is_none());

    store.persist(&state).await.unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.snapshot_path()).unwrap()).unwrap();
    assert_eq!(written["projects"]["Noto Serif Tamil"], "garbage");
}

#[tokio::test]
async fn test_persist_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::local(dir.path().join("state.json"));

    store.persist(&known_state()).await.unwrap();
    let mut next = known_state();
    next.record(BuildResult::new("Noto Serif Tamil").with_fingerprint(Some("fff".to_string())));
    store.persist(&next).await.unwrap();

    let loaded = store.load().await;
    assert_eq!(loaded, next);
    assert!(!loaded.get("Noto Serif Tamil").unwrap().is_failed());
}

#[tokio::test]
async fn test_persist_into_unwritable_location_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a directory").unwrap();

    let store = StateStore::local(blocker.join("state.json"));
    assert!(store.persist(&known_state()).await.is_err());
}
