//! Asymmetric cryptography capability.
//!
//! [`KeyBackend`] is the narrow interface the key manager and codec use to
//! create, import, and export the store's key pair and to encrypt and
//! decrypt credential blobs. [`AgeBackend`] implements it with x25519 keys
//! from the `age` crate.
//!
//! The age backend writes its private key in the age identity-file format,
//! with the creation time, the key's user id, and the derived public key
//! recorded as header comments:
//!
//! ```text
//! # created: 2024-01-01T00:00:00Z
//! # identity: alice
//! # public key: age1...
//! AGE-SECRET-KEY-1...
//! ```

use std::str::FromStr;

use age::secrecy::ExposeSecret;
use age::x25519;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use zeroize::Zeroizing;

/// Failure reported by a [`KeyBackend`].
///
/// The key manager and codec translate it into the matching
/// [`crate::SecretError`] variant for the operation that failed.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CryptoError(String);

impl CryptoError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Armored halves of a key pair, ready to be written to disk.
pub struct ExportedKeys {
    pub private_armored: Zeroizing<String>,
    pub public_armored: String,
}

/// Cryptographic capability consumed by the store.
#[async_trait]
pub trait KeyBackend: Send + Sync + 'static {
    /// The backend's key pair. Read-only once resolved.
    type KeyPair: Send + Sync + 'static;

    /// Parse armored private-key text into a key pair.
    async fn import_private_key(&self, armored: &str) -> Result<Self::KeyPair, CryptoError>;

    /// Generate a fresh key pair for `identity`.
    async fn generate_key_pair(&self, identity: &str) -> Result<Self::KeyPair, CryptoError>;

    /// Certify a freshly generated key and export both halves.
    async fn sign_and_export(&self, key: &Self::KeyPair) -> Result<ExportedKeys, CryptoError>;

    /// Encrypt `plaintext` to the public half of `key`.
    async fn encrypt(&self, plaintext: &[u8], key: &Self::KeyPair) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt `ciphertext` with the private half of `key`.
    ///
    /// Returns the literal data segments of the message in order.
    async fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &Self::KeyPair,
    ) -> Result<Vec<Vec<u8>>, CryptoError>;
}

/// Header comment naming the key's user id.
const IDENTITY_COMMENT: &str = "# identity: ";

/// An x25519 key pair.
pub struct AgeKeyPair {
    identity: x25519::Identity,
    recipient: x25519::Recipient,
    user_id: Option<String>,
}

impl AgeKeyPair {
    fn new(identity: x25519::Identity, user_id: Option<String>) -> Self {
        let recipient = identity.to_public();
        Self {
            identity,
            recipient,
            user_id,
        }
    }

    /// The public half in `age1...` form.
    pub fn public_key(&self) -> String {
        self.recipient.to_string()
    }

    /// User id recorded when the key was generated, if known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl std::fmt::Debug for AgeKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgeKeyPair")
            .field("public_key", &self.public_key())
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// [`KeyBackend`] backed by age x25519 encryption.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeBackend;

impl AgeBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyBackend for AgeBackend {
    type KeyPair = AgeKeyPair;

    async fn import_private_key(&self, armored: &str) -> Result<AgeKeyPair, CryptoError> {
        let mut user_id = None;
        let mut secret_line = None;

        for line in armored.lines().map(str::trim) {
            if let Some(uid) = line.strip_prefix(IDENTITY_COMMENT) {
                user_id = Some(uid.trim().to_string());
            } else if line.is_empty() || line.starts_with('#') {
                continue;
            } else {
                secret_line = Some(line);
                break;
            }
        }

        let secret_line =
            secret_line.ok_or_else(|| CryptoError::new("no secret key found in key file"))?;
        let identity = x25519::Identity::from_str(secret_line)
            .map_err(|e| CryptoError::new(format!("invalid secret key: {e}")))?;

        Ok(AgeKeyPair::new(identity, user_id))
    }

    async fn generate_key_pair(&self, identity: &str) -> Result<AgeKeyPair, CryptoError> {
        if identity.contains('\n') {
            return Err(CryptoError::new("identity must be a single line"));
        }
        Ok(AgeKeyPair::new(
            x25519::Identity::generate(),
            Some(identity.to_string()),
        ))
    }

    async fn sign_and_export(&self, key: &AgeKeyPair) -> Result<ExportedKeys, CryptoError> {
        let public_key = key.public_key();

        // An x25519 recipient is derived from the secret, so certifying the
        // pair amounts to recording that derivation next to the secret.
        let derived = x25519::Recipient::from_str(&public_key)
            .map_err(|e| CryptoError::new(format!("public key does not round-trip: {e}")))?;
        if derived.to_string() != key.identity.to_public().to_string() {
            return Err(CryptoError::new("public key does not match secret key"));
        }

        let mut header = format!(
            "# created: {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        if let Some(uid) = key.user_id() {
            header.push_str(&format!("{IDENTITY_COMMENT}{uid}\n"));
        }
        header.push_str(&format!("# public key: {public_key}\n"));

        let secret = key.identity.to_string();
        Ok(ExportedKeys {
            private_armored: Zeroizing::new(format!("{header}{}\n", secret.expose_secret())),
            public_armored: format!("{header}{public_key}\n"),
        })
    }

    async fn encrypt(&self, plaintext: &[u8], key: &AgeKeyPair) -> Result<Vec<u8>, CryptoError> {
        age::encrypt(&key.recipient, plaintext).map_err(|e| CryptoError::new(e.to_string()))
    }

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &AgeKeyPair,
    ) -> Result<Vec<Vec<u8>>, CryptoError> {
        let plaintext =
            age::decrypt(&key.identity, ciphertext).map_err(|e| CryptoError::new(e.to_string()))?;
        Ok(vec![plaintext])
    }
}
