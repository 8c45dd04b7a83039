#![allow(dead_code)]

use ruts_mongodb::store::{Error, Removal, SessionStore};
use ruts_mongodb::{SessionData, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TestUser {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TestPreferences {
    pub theme: String,
    pub language: String,
}

pub fn create_test_session() -> SessionData {
    let mut data = SessionData::new();
    data.insert(
        "user",
        &TestUser {
            id: 1,
            name: "Test User".to_string(),
        },
    )
    .unwrap();
    data.insert(
        "preferences",
        &TestPreferences {
            theme: "dark".to_string(),
            language: "en".to_string(),
        },
    )
    .unwrap();
    data
}

pub fn payload(value: serde_json::Value) -> SessionData {
    SessionData::try_from(value).unwrap()
}

/// Strips the `_id` field a store adds to fetched payloads.
pub fn without_id(mut data: SessionData) -> SessionData {
    data.remove("_id");
    data
}

pub async fn assert_round_trip<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();
    let data = create_test_session();

    store.store(&session_id, &data).await.unwrap();

    let fetched = store.fetch(&session_id).await.unwrap().unwrap();
    assert_eq!(fetched.id(), Some(session_id.as_str()));
    assert_eq!(without_id(fetched.clone()), data);
    assert_eq!(
        fetched.get::<TestUser>("user").unwrap().unwrap().name,
        "Test User"
    );
}

pub async fn assert_unknown_session_is_absent<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();
    assert!(store.fetch(&session_id).await.unwrap().is_none());
}

pub async fn assert_store_overwrites<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();

    store
        .store(&session_id, &payload(json!({ "user": "alice", "cart": [1, 2] })))
        .await
        .unwrap();
    store
        .store(&session_id, &payload(json!({ "theme": "light" })))
        .await
        .unwrap();

    let fetched = store.fetch(&session_id).await.unwrap().unwrap();
    assert_eq!(without_id(fetched), payload(json!({ "theme": "light" })));
}

pub async fn assert_remove_then_absent<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();

    store
        .store(&session_id, &create_test_session())
        .await
        .unwrap();
    assert!(store.remove(&session_id).await.is_deleted());
    assert!(store.fetch(&session_id).await.unwrap().is_none());
}

pub async fn assert_remove_unknown_is_ok<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();
    let removal = store.remove(&session_id).await;
    assert!(matches!(removal, Removal::Absent), "got {removal:?}");
}

pub async fn assert_unencodable_payload_is_rejected<S: SessionStore>(store: &S) {
    let session_id = SessionId::generate();

    let result = store
        .store(&session_id, &payload(json!({ "big": u64::MAX })))
        .await;

    assert!(matches!(result, Err(Error::Encode(_))), "got {result:?}");
    assert!(store.fetch(&session_id).await.unwrap().is_none());
}

pub async fn assert_scenario<S: SessionStore>(store: &S) {
    let session_id = SessionId::new("abc123").unwrap();
    // Leftovers from an earlier run must not leak into the scenario.
    let _ = store.remove(&session_id).await;

    store
        .store(&session_id, &payload(json!({ "user": "alice", "count": 1 })))
        .await
        .unwrap();

    let fetched = store.fetch(&session_id).await.unwrap().unwrap();
    assert_eq!(
        serde_json::Value::from(fetched),
        json!({ "_id": "abc123", "user": "alice", "count": 1 })
    );

    assert!(store.remove(&session_id).await.is_deleted());
    assert!(store.fetch(&session_id).await.unwrap().is_none());
}
