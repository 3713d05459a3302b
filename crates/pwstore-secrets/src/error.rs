//! Error types for credential storage.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Key import failed: {0}")]
    KeyImport(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecretError {
    /// True for filesystem "not found" failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Terminal failure of key resolution.
///
/// Held by the readiness gate and handed out as a copy to every caller, so
/// it must stay cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Key import failed: {0}")]
    Import(String),

    #[error("Key generation failed: {0}")]
    Generation(String),
}

impl From<KeyError> for SecretError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::Import(msg) => Self::KeyImport(msg),
            KeyError::Generation(msg) => Self::KeyGeneration(msg),
        }
    }
}

impl From<pwstore_core::ConfigError> for SecretError {
    fn from(e: pwstore_core::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

/// Convenience result alias for store operations.
pub type Result<T> = std::result::Result<T, SecretError>;
