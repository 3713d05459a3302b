//! Config save/load roundtrip integration tests.

use pwstore_core::StoreConfig;
use pwstore_secrets::{CredentialStore, PasswordStore};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let config = StoreConfig {
        identity: Some("alice".to_string()),
        ..StoreConfig::new(dir.path().join("store"), dir.path().join("store.key"))
    };
    config.save(&path).unwrap();

    let loaded = StoreConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_nonexistent() {
    let result = StoreConfig::load(Path::new("/nonexistent/config.json5"));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_store_from_loaded_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");
    std::fs::write(
        &path,
        format!(
            "{{ store_dir: {}, private_key_file: {}, identity: 'alice' }}",
            serde_json::to_string(&dir.path().join("store")).unwrap(),
            serde_json::to_string(&dir.path().join("keys").join("store.key")).unwrap(),
        ),
    )
    .unwrap();

    let config = StoreConfig::load(&path).unwrap();
    let store = PasswordStore::from_config(&config).unwrap();
    store.set_password("Mail", "alice", "hunter2").await.unwrap();

    let key_text = std::fs::read_to_string(dir.path().join("keys").join("store.key")).unwrap();
    assert!(key_text.contains("# identity: alice"));
    assert!(dir.path().join("keys").join("store.key.pub").exists());
    assert!(dir.path().join("store").join("Mail").join("alice.gpg").exists());
}
