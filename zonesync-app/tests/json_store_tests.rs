//! JsonZoneStore behavior against a real filesystem.

#![allow(clippy::unwrap_used)]

use zonesync_app::adapters::JsonZoneStore;
use zonesync_app::sample_config;
use zonesync_core::error::CoreError;
use zonesync_core::traits::ZoneRepository;

#[tokio::test]
async fn missing_file_reads_as_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonZoneStore::new(dir.path().join("zones.json"));
    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonZoneStore::new(dir.path().join("zones.json"));

    let zones = sample_config();
    store.save_all(&zones).await.unwrap();

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded, zones);
}

#[tokio::test]
async fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonZoneStore::new(dir.path().join("nested/deeper/zones.json"));

    store.save_all(&sample_config()).await.unwrap();
    assert!(store.path().exists());
}

#[tokio::test]
async fn invalid_json_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zones.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let store = JsonZoneStore::new(path);
    let err = store.load_all().await.unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}

#[tokio::test]
async fn empty_document_reads_as_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zones.json");
    tokio::fs::write(&path, b"{}").await.unwrap();

    let store = JsonZoneStore::new(path);
    assert!(store.load_all().await.unwrap().is_empty());
}
