//! Shared fixtures for the integration tests.

use pwstore_core::config::ResolvedConfig;
use pwstore_secrets::PasswordStore;
use tempfile::TempDir;

/// Paths for a throwaway store inside `dir`.
pub fn temp_config(dir: &TempDir) -> ResolvedConfig {
    ResolvedConfig {
        store_dir: dir.path().join(".password-store"),
        private_key_file: dir.path().join("test.pgp"),
        identity: "integration".to_string(),
    }
}

/// A lazily-initialized store rooted in a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_store() -> (PasswordStore, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let store = PasswordStore::new(temp_config(&dir));
    (store, dir)
}
