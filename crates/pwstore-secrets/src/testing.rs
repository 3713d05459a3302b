//! In-memory [`KeyBackend`] for exercising the gate and failure paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::crypto::{CryptoError, ExportedKeys, KeyBackend};

const PRIVATE_PREFIX: &str = "FAKE-SECRET-";
const PUBLIC_PREFIX: &str = "FAKE-PUBLIC-";
const MAGIC: &[u8] = b"FAKE";

/// A one-byte XOR "key pair".
#[derive(Debug)]
pub(crate) struct FakeKeyPair {
    pub key: u8,
}

#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub generated: AtomicUsize,
    pub imported: AtomicUsize,
    pub fail_export: bool,
    pub fail_encrypt: bool,
    /// Return no literal segments from `decrypt`.
    pub empty_decrypt: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }

    pub fn imported(&self) -> usize {
        self.imported.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyBackend for FakeBackend {
    type KeyPair = FakeKeyPair;

    async fn import_private_key(&self, armored: &str) -> Result<FakeKeyPair, CryptoError> {
        self.imported.fetch_add(1, Ordering::SeqCst);
        let key = armored
            .trim()
            .strip_prefix(PRIVATE_PREFIX)
            .and_then(|k| k.parse::<u8>().ok())
            .ok_or_else(|| CryptoError::new("not a fake secret key"))?;
        Ok(FakeKeyPair { key })
    }

    async fn generate_key_pair(&self, _identity: &str) -> Result<FakeKeyPair, CryptoError> {
        // Yield so concurrent first callers overlap with resolution.
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.generated.fetch_add(1, Ordering::SeqCst);
        Ok(FakeKeyPair { key: 0x5a })
    }

    async fn sign_and_export(&self, key: &FakeKeyPair) -> Result<ExportedKeys, CryptoError> {
        if self.fail_export {
            return Err(CryptoError::new("export refused"));
        }
        Ok(ExportedKeys {
            private_armored: Zeroizing::new(format!("{PRIVATE_PREFIX}{}\n", key.key)),
            public_armored: format!("{PUBLIC_PREFIX}{}\n", key.key),
        })
    }

    async fn encrypt(&self, plaintext: &[u8], key: &FakeKeyPair) -> Result<Vec<u8>, CryptoError> {
        if self.fail_encrypt {
            return Err(CryptoError::new("encrypt refused"));
        }
        let mut out = MAGIC.to_vec();
        out.extend(plaintext.iter().map(|b| b ^ key.key));
        Ok(out)
    }

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &FakeKeyPair,
    ) -> Result<Vec<Vec<u8>>, CryptoError> {
        let body = ciphertext
            .strip_prefix(MAGIC)
            .ok_or_else(|| CryptoError::new("malformed envelope"))?;
        if self.empty_decrypt {
            return Ok(Vec::new());
        }
        Ok(vec![body.iter().map(|b| b ^ key.key).collect()])
    }
}
