//! Key pair resolution behind a one-shot readiness gate.
//!
//! The store's key pair is resolved in this order:
//! 1. Import the armored private key from `private_key_file` if it exists
//! 2. Otherwise generate a new pair, certify it, and write the private half
//!    to `private_key_file` (0600) and the public half to
//!    `private_key_file.pub` (0644)
//!
//! Resolution runs at most once per [`KeyManager`]. Concurrent first callers
//! wait on the same resolution, and a failure is terminal: every later call
//! receives the same error.
//!
//! Two processes that both find no key file will each generate and write a
//! key pair; the last writer wins on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::crypto::KeyBackend;
use crate::error::{KeyError, Result};
use crate::files::{self, PRIVATE_FILE_MODE, PUBLIC_FILE_MODE};

/// Observable lifecycle of a [`KeyManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Uninitialized,
    Resolving,
    Ready,
    Failed,
}

type Resolution<K> = std::result::Result<Arc<K>, KeyError>;

/// Owns the store's single key pair.
pub struct KeyManager<B: KeyBackend> {
    backend: Arc<B>,
    private_key_file: PathBuf,
    public_key_file: PathBuf,
    identity: String,
    resolving: AtomicBool,
    gate: OnceCell<Resolution<B::KeyPair>>,
}

impl<B: KeyBackend> KeyManager<B> {
    /// Create an unresolved key manager. No I/O happens until [`Self::ready`].
    pub fn new(backend: Arc<B>, private_key_file: PathBuf, identity: impl Into<String>) -> Self {
        let public_key_file = pwstore_core::paths::public_key_file(&private_key_file);
        Self {
            backend,
            private_key_file,
            public_key_file,
            identity: identity.into(),
            resolving: AtomicBool::new(false),
            gate: OnceCell::new(),
        }
    }

    pub fn private_key_file(&self) -> &Path {
        &self.private_key_file
    }

    pub fn public_key_file(&self) -> &Path {
        &self.public_key_file
    }

    /// Current state, without triggering resolution.
    pub fn state(&self) -> KeyState {
        match self.gate.get() {
            Some(Ok(_)) => KeyState::Ready,
            Some(Err(_)) => KeyState::Failed,
            None if self.resolving.load(Ordering::Acquire) => KeyState::Resolving,
            None => KeyState::Uninitialized,
        }
    }

    /// Wait for the key pair, resolving it on first call.
    pub async fn ready(&self) -> Result<Arc<B::KeyPair>> {
        let resolution = self.gate.get_or_init(|| self.resolve()).await;
        match resolution {
            Ok(key) => Ok(Arc::clone(key)),
            Err(e) => Err(e.clone().into()),
        }
    }

    async fn resolve(&self) -> Resolution<B::KeyPair> {
        self.resolving.store(true, Ordering::Release);
        let path = &self.private_key_file;

        let key = match tokio::fs::read_to_string(path).await {
            Ok(armored) => {
                debug!(path = %path.display(), "importing private key");
                self.backend
                    .import_private_key(&armored)
                    .await
                    .map_err(|e| KeyError::Import(e.to_string()))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => self.generate().await?,
            Err(e) => {
                return Err(KeyError::Import(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };

        Ok(Arc::new(key))
    }

    async fn generate(&self) -> std::result::Result<B::KeyPair, KeyError> {
        info!(
            path = %self.private_key_file.display(),
            identity = %self.identity,
            "generating new key pair"
        );
        let key = self
            .backend
            .generate_key_pair(&self.identity)
            .await
            .map_err(generation_error)?;
        let exported = self
            .backend
            .sign_and_export(&key)
            .await
            .map_err(generation_error)?;

        if let Some(parent) = self.private_key_file.parent() {
            if !parent.as_os_str().is_empty() {
                files::create_private_dir(parent)
                    .await
                    .map_err(generation_error)?;
            }
        }

        files::write_file(
            &self.private_key_file,
            exported.private_armored.as_bytes(),
            PRIVATE_FILE_MODE,
        )
        .await
        .map_err(generation_error)?;
        if let Err(e) = files::write_file(
            &self.public_key_file,
            exported.public_armored.as_bytes(),
            PUBLIC_FILE_MODE,
        )
        .await
        {
            // A private key without its public half must not be imported later.
            if let Err(cleanup) = tokio::fs::remove_file(&self.private_key_file).await {
                warn!(
                    path = %self.private_key_file.display(),
                    "failed to remove private key after public key write failed: {cleanup}"
                );
            }
            return Err(generation_error(e));
        }

        debug!(path = %self.public_key_file.display(), "wrote public key");
        Ok(key)
    }
}

fn generation_error(e: impl std::fmt::Display) -> KeyError {
    KeyError::Generation(e.to_string())
}
