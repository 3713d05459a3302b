//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store configuration.
///
/// Every field is optional in the file; unset fields fall back to the
/// defaults in [`crate::paths`] and the operating user's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root of the credential tree (`<root>/<service>/<account>.gpg`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,

    /// Armored private key file. The public key is written next to it
    /// with a `.pub` suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_file: Option<PathBuf>,

    /// User id embedded in a newly generated key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

/// A configuration with every path and the identity resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub store_dir: PathBuf,
    pub private_key_file: PathBuf,
    pub identity: String,
}
