//! Credential storage.
//!
//! Defines the [`CredentialStore`] trait and provides [`PasswordStore`], which
//! keeps each credential as an encrypted blob at
//! `<store_dir>/<service>/<account>.gpg`. Blobs are created with mode `0600`
//! and service directories with mode `0700` on Unix.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use pwstore_core::config::ResolvedConfig;
use pwstore_core::StoreConfig;
use tracing::{debug, warn};

use crate::codec::CredentialCodec;
use crate::crypto::{AgeBackend, KeyBackend};
use crate::error::{Result, SecretError};
use crate::files::{self, PRIVATE_FILE_MODE};
use crate::keys::KeyManager;
use crate::types::{Credential, DecryptedSecret};

/// File name suffix of every credential blob.
pub const BLOB_SUFFIX: &str = ".gpg";

/// Async trait for credential stores.
///
/// Every operation waits for the store's key pair first and fails with the
/// key error if it could not be resolved.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Retrieve and decrypt a credential. Missing credentials are `Ok(None)`.
    async fn get_password(&self, service: &str, account: &str) -> Result<Option<DecryptedSecret>>;

    /// Encrypt and store a credential, replacing any existing one.
    async fn set_password(&self, service: &str, account: &str, secret: &str) -> Result<()>;

    /// Delete a credential. Returns `false` if there was nothing to delete.
    async fn delete_password(&self, service: &str, account: &str) -> Result<bool>;

    /// Decrypt every credential stored under `service`.
    ///
    /// Listing is best-effort: an entry that cannot be read or decrypted is
    /// left out of the result instead of failing the whole call. Failing to
    /// list the service directory itself is still an error.
    async fn find_credentials(&self, service: &str) -> Result<Vec<Credential>>;

    /// Look up a credential by its combined `service/account` name.
    ///
    /// Equivalent to `get_password("", name)`: the empty service joins away,
    /// so `"Mail/alice"` resolves to the same blob as `("Mail", "alice")`.
    async fn find_password(&self, name: &str) -> Result<Option<DecryptedSecret>> {
        self.get_password("", name).await
    }
}

/// A credential store protected by a single key pair.
pub struct PasswordStore<B: KeyBackend = AgeBackend> {
    store_dir: PathBuf,
    keys: KeyManager<B>,
    codec: CredentialCodec<B>,
}

impl PasswordStore<AgeBackend> {
    /// Create a store using age encryption. The key pair is resolved on
    /// first use.
    pub fn new(config: ResolvedConfig) -> Self {
        Self::with_backend(config, AgeBackend::new())
    }

    /// Create a store and wait for its key pair to be ready.
    pub async fn open(config: ResolvedConfig) -> Result<Self> {
        let store = Self::new(config);
        store.ready().await?;
        Ok(store)
    }

    /// Resolve `config` against the defaults and create a store.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(config.resolve()?))
    }
}

impl<B: KeyBackend> PasswordStore<B> {
    /// Create a store over a specific cryptographic backend.
    pub fn with_backend(config: ResolvedConfig, backend: B) -> Self {
        let backend = Arc::new(backend);
        let keys = KeyManager::new(
            Arc::clone(&backend),
            config.private_key_file,
            config.identity,
        );
        Self {
            store_dir: config.store_dir,
            keys,
            codec: CredentialCodec::new(backend),
        }
    }

    /// Wait until the key pair is loaded or generated.
    pub async fn ready(&self) -> Result<()> {
        self.keys.ready().await.map(|_| ())
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn key_manager(&self) -> &KeyManager<B> {
        &self.keys
    }

    /// Resolve the blob path for a credential.
    ///
    /// Segments are joined as paths, so an empty `service` contributes
    /// nothing and a `/` inside `account` adds a directory level. The joined
    /// name must still come out as exactly `<service>/<account>.gpg`.
    pub fn credential_path(&self, service: &str, account: &str) -> Result<PathBuf> {
        reject_nul("service", service)?;
        reject_nul("account", account)?;
        let relative = Path::new(service).join(format!("{account}{BLOB_SUFFIX}"));
        if normal_depth(&relative)? != 2 {
            return Err(SecretError::InvalidName(format!(
                "credential must resolve to <service>/<account>: {}",
                relative.display()
            )));
        }
        Ok(self.store_dir.join(relative))
    }
}

fn reject_nul(kind: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(SecretError::InvalidName(format!(
            "{kind} must not contain NUL bytes"
        )));
    }
    Ok(())
}

/// Count the named components of a relative path.
///
/// Absolute paths and `..` components would resolve outside the store
/// directory and are rejected.
fn normal_depth(path: &Path) -> Result<usize> {
    let mut depth = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(SecretError::InvalidName(format!(
                    "name must not contain '..': {}",
                    path.display()
                )))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(SecretError::InvalidName(format!(
                    "name must be relative: {}",
                    path.display()
                )))
            }
        }
    }
    Ok(depth)
}

fn validate_service(service: &str) -> Result<()> {
    reject_nul("service", service)?;
    if normal_depth(Path::new(service))? != 1 {
        return Err(SecretError::InvalidName(format!(
            "service must name a single directory: {service:?}"
        )));
    }
    Ok(())
}

/// A missing blob, or a path component that is not a directory, both mean
/// the credential does not exist.
fn is_absent(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[async_trait]
impl<B: KeyBackend> CredentialStore for PasswordStore<B> {
    async fn get_password(&self, service: &str, account: &str) -> Result<Option<DecryptedSecret>> {
        let key = self.keys.ready().await?;
        let path = self.credential_path(service, account)?;

        let blob = match tokio::fs::read(&path).await {
            Ok(blob) => blob,
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        debug!(service, account, path = %path.display(), "reading credential");
        self.codec.decode(&blob, &key).await.map(Some)
    }

    async fn set_password(&self, service: &str, account: &str, secret: &str) -> Result<()> {
        let key = self.keys.ready().await?;
        let path = self.credential_path(service, account)?;

        if let Some(parent) = path.parent() {
            files::create_private_dir(parent).await?;
        }

        let blob = self.codec.encode(secret, &key).await?;
        debug!(service, account, path = %path.display(), "writing credential");
        files::write_file(&path, &blob, PRIVATE_FILE_MODE).await?;
        Ok(())
    }

    async fn delete_password(&self, service: &str, account: &str) -> Result<bool> {
        self.keys.ready().await?;
        let path = self.credential_path(service, account)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(service, account, path = %path.display(), "deleted credential");
                Ok(true)
            }
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_credentials(&self, service: &str) -> Result<Vec<Credential>> {
        self.keys.ready().await?;
        validate_service(service)?;
        let service_dir = self.store_dir.join(service);

        let mut accounts = Vec::new();
        let mut entries = tokio::fs::read_dir(&service_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(account) = name.strip_suffix(BLOB_SUFFIX) {
                accounts.push(account.to_string());
            }
        }

        let lookups = accounts.iter().map(|account| async move {
            (account, self.get_password(service, account).await)
        });

        let mut credentials = Vec::with_capacity(accounts.len());
        for (account, result) in join_all(lookups).await {
            match result {
                Ok(Some(secret)) => credentials.push(Credential {
                    account: account.clone(),
                    secret,
                }),
                // Removed between listing and reading.
                Ok(None) => {}
                Err(e) => {
                    warn!(service, account = %account, "skipping unreadable credential: {e}");
                }
            }
        }

        credentials.sort_by(|a, b| a.account.cmp(&b.account));
        Ok(credentials)
    }
}
