//! Plaintext secrets to encrypted blobs and back.
//!
//! Blobs hold the secret followed by a single `\n`, encrypted to the store's
//! public key. The newline is part of the on-disk format only and never
//! reaches callers.

use std::sync::Arc;

use zeroize::Zeroize;

use crate::crypto::KeyBackend;
use crate::error::{Result, SecretError};
use crate::types::DecryptedSecret;

const LINE_END: u8 = b'\n';

/// Stateless encoder/decoder over a [`KeyBackend`].
pub struct CredentialCodec<B: KeyBackend> {
    backend: Arc<B>,
}

impl<B: KeyBackend> CredentialCodec<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Encrypt `secret` plus the trailing newline for `key`.
    pub async fn encode(&self, secret: &str, key: &B::KeyPair) -> Result<Vec<u8>> {
        let mut plaintext = Vec::with_capacity(secret.len() + 1);
        plaintext.extend_from_slice(secret.as_bytes());
        plaintext.push(LINE_END);

        let result = self.backend.encrypt(&plaintext, key).await;
        plaintext.zeroize();
        result.map_err(|e| SecretError::Encryption(e.to_string()))
    }

    /// Decrypt a blob and strip its trailing newline.
    ///
    /// Only the first literal segment of the message is used.
    pub async fn decode(&self, ciphertext: &[u8], key: &B::KeyPair) -> Result<DecryptedSecret> {
        let segments = self
            .backend
            .decrypt(ciphertext, key)
            .await
            .map_err(|e| SecretError::Decryption(e.to_string()))?;

        let mut plaintext = segments
            .into_iter()
            .next()
            .ok_or_else(|| SecretError::Decryption("message has no literal data".to_string()))?;
        if plaintext.last() == Some(&LINE_END) {
            plaintext.pop();
        }

        String::from_utf8(plaintext)
            .map(DecryptedSecret::new)
            .map_err(|e| {
                e.into_bytes().zeroize();
                SecretError::Decryption("plaintext is not valid UTF-8".to_string())
            })
    }
}
