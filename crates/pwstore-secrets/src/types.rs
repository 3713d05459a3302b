//! Core types for credential storage.

use serde::{Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A decrypted credential held in memory.
///
/// The plaintext is zeroed on drop and never printed: Debug and Display both
/// emit `[REDACTED]`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DecryptedSecret {
    plaintext: String,
}

impl DecryptedSecret {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self {
            plaintext: plaintext.into(),
        }
    }

    /// Expose the plaintext value. Use sparingly.
    pub fn expose(&self) -> &str {
        &self.plaintext
    }
}

impl fmt::Debug for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for DecryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for DecryptedSecret {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for DecryptedSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Only reached on explicit export (`pwstore list --json`).
        self.plaintext.serialize(serializer)
    }
}

/// One entry returned by [`crate::CredentialStore::find_credentials`].
///
/// Serializes as `{"account": ..., "password": ...}`, the shape other
/// keychain libraries use for credential listings.
#[derive(Debug, Clone, Serialize)]
pub struct Credential {
    pub account: String,

    #[serde(rename = "password")]
    pub secret: DecryptedSecret,
}
