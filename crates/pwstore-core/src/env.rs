//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Name of the operating user, used as the default key identity.
pub fn current_user() -> Option<String> {
    get_var("USER").or_else(|| get_var("USERNAME"))
}

/// Common environment variable names.
pub mod vars {
    /// Config file override.
    pub const PWSTORE_CONFIG: &str = "PWSTORE_CONFIG";

    /// Credential tree root override.
    pub const PWSTORE_DIR: &str = "PWSTORE_DIR";

    /// Private key file override.
    pub const PWSTORE_KEY_FILE: &str = "PWSTORE_KEY_FILE";

    /// Identity embedded in a newly generated key.
    pub const PWSTORE_IDENTITY: &str = "PWSTORE_IDENTITY";
}
