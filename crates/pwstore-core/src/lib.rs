//! # pwstore-core
//!
//! Shared functionality for the pwstore crates:
//!
//! - **Configuration**: Loading and validating the store configuration
//! - **Paths**: Default locations for the store directory and key file
//! - **Utilities**: Environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::StoreConfig;
pub use error::{ConfigError, Result};
