//! Browser build configuration.
//!
//! The client settings are compiled in from `config/gfinder.toml` using
//! `include_str!`, so the bundle carries no runtime config fetch.

use gfinder_core::{ClientConfig, ConfigError};

// =============================================================================
// Embedded Settings (loaded at compile time)
// =============================================================================

/// Raw TOML the browser client is configured from.
pub const CLIENT_TOML: &str = include_str!("../config/gfinder.toml");

// =============================================================================
// Logging
// =============================================================================

/// Most verbose level forwarded to the browser console.
pub const LOG_LEVEL: tracing::Level = tracing::Level::INFO;

/// Parse the embedded client settings.
pub fn client_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_toml(CLIENT_TOML)
}
