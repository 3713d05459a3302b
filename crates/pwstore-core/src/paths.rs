//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Name of the directory holding pwstore's own files (config, key pair).
const BASE_DIR_NAME: &str = ".pwstore";

/// Name of the credential tree, shared with other password-store tools.
const STORE_DIR_NAME: &str = ".password-store";

fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .ok_or_else(|| ConfigError::Validation("Could not determine home directory".to_string()))
}

/// Get the pwstore base directory (~/.pwstore).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(BASE_DIR_NAME))
}

/// Get the main config file path (~/.pwstore/config.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("config.json5"))
}

/// Get the default private key file (~/.pwstore/store.key).
pub fn private_key_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("store.key"))
}

/// Get the default credential tree root (~/.password-store).
pub fn store_dir() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(STORE_DIR_NAME))
}

/// Public key file that accompanies a private key file (`<key>.pub`).
pub fn public_key_file(private_key_file: &Path) -> PathBuf {
    let mut name = private_key_file.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
