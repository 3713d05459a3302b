//! Key-pair protected credential storage.
//!
//! Each credential is encrypted to the store's single asymmetric key pair and
//! written to `<root>/<service>/<account>.gpg`. The key pair is loaded from (or
//! generated into) a private key file exactly once per store, behind a
//! readiness gate that every operation awaits.

pub mod codec;
pub mod crypto;
pub mod error;
mod files;
pub mod keys;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

pub use codec::CredentialCodec;
pub use crypto::{AgeBackend, AgeKeyPair, CryptoError, ExportedKeys, KeyBackend};
pub use error::{KeyError, Result, SecretError};
pub use keys::{KeyManager, KeyState};
pub use store::{CredentialStore, PasswordStore, BLOB_SUFFIX};
pub use types::{Credential, DecryptedSecret};
