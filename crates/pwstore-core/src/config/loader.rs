//! Configuration loading and persistence.

use super::{ResolvedConfig, StoreConfig};
use crate::env::{self, vars};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identity used when neither the config nor the environment names a user.
const FALLBACK_IDENTITY: &str = "pwstore";

impl StoreConfig {
    /// Build a configuration rooted at explicit paths.
    pub fn new(store_dir: impl Into<PathBuf>, private_key_file: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: Some(store_dir.into()),
            private_key_file: Some(private_key_file.into()),
            identity: None,
        }
    }

    /// Load configuration from `PWSTORE_CONFIG` or the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = match env::get_var(vars::PWSTORE_CONFIG) {
            Some(p) => paths::expand_tilde(Path::new(&p)),
            None => paths::config_file()?,
        };
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load from `path`, treating a missing file as an empty configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        };
        match loaded {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Apply `PWSTORE_DIR`, `PWSTORE_KEY_FILE` and `PWSTORE_IDENTITY`.
    pub fn apply_env(mut self) -> Self {
        if let Some(dir) = env::get_var(vars::PWSTORE_DIR) {
            self.store_dir = Some(dir.into());
        }
        if let Some(key) = env::get_var(vars::PWSTORE_KEY_FILE) {
            self.private_key_file = Some(key.into());
        }
        if let Some(identity) = env::get_var(vars::PWSTORE_IDENTITY) {
            self.identity = Some(identity);
        }
        self
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if let Some(identity) = &self.identity {
            if identity.trim().is_empty() {
                errors.push("identity must not be blank".to_string());
            }
            if identity.contains('\n') {
                errors.push("identity must be a single line".to_string());
            }
        }

        if let Some(key) = &self.private_key_file {
            if key.as_os_str().is_empty() {
                errors.push("private_key_file must not be empty".to_string());
            } else if key.file_name().is_none() {
                errors.push(format!(
                    "private_key_file '{}' does not name a file",
                    key.display()
                ));
            }
        }

        if let Some(dir) = &self.store_dir {
            if dir.as_os_str().is_empty() {
                errors.push("store_dir must not be empty".to_string());
            }
        }

        if let (Some(dir), Some(key)) = (&self.store_dir, &self.private_key_file) {
            if dir == key {
                errors.push("store_dir and private_key_file must differ".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Validate, then fill every unset field from the defaults.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.validate()?;

        let store_dir = match &self.store_dir {
            Some(dir) => paths::expand_tilde(dir),
            None => paths::store_dir()?,
        };
        let private_key_file = match &self.private_key_file {
            Some(key) => paths::expand_tilde(key),
            None => paths::private_key_file()?,
        };
        let identity = self
            .identity
            .clone()
            .or_else(env::current_user)
            .unwrap_or_else(|| FALLBACK_IDENTITY.to_string());

        Ok(ResolvedConfig {
            store_dir,
            private_key_file,
            identity,
        })
    }
}

impl ResolvedConfig {
    /// Path of the public key written alongside the private key.
    pub fn public_key_file(&self) -> PathBuf {
        paths::public_key_file(&self.private_key_file)
    }
}
