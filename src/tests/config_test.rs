use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::config::{
    config::{DeliveryMode, StoreBackend, StoreWriteMode},
    Config,
};

#[test]
fn test_for_default_config() {
    let config = Config::default();

    assert_eq!(config.server_address(), "0.0.0.0:8080");
    assert_eq!(config.store.backend, StoreBackend::JsonFile);
    assert_eq!(config.store.write_mode, StoreWriteMode::Serialized);
    assert_eq!(config.notification.delivery, DeliveryMode::Cursor);
    assert!(!config.notification.filter_by_user_id);
    assert_eq!(
        config.user.heart_beat_interval(),
        Some(Duration::from_secs(30))
    );
}

#[test]
fn test_for_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("config.json");

    let mut config = Config::default();
    config.store.write_mode = StoreWriteMode::Unguarded;
    config.notification.delivery = DeliveryMode::FullReplay;
    config.user.heart_beat_time = 0;
    config.write_to_file(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"unguarded\""));
    assert!(raw.contains("\"full_replay\""));

    let read = Config::try_read_from_file(&path).unwrap();
    assert_eq!(read.store.write_mode, StoreWriteMode::Unguarded);
    assert_eq!(read.notification.delivery, DeliveryMode::FullReplay);
    assert_eq!(read.user.heart_beat_interval(), None);
}

#[test]
fn test_for_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::try_read_from_file(&dir.path().join("absent.json")).is_err());
}
