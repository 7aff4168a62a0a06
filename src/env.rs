//! Environment variable names used by this crate for convenient
//! configuration from hosted entrypoints.
//!
//! These are purely helpers; the core pipeline types remain decoupled from
//! environment access.

use crate::level::Level;

/// Emission threshold selector, e.g. `LOG_LEVEL=debug`. Custom level names
/// resolve too once registered.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Threshold from [`LOG_LEVEL_ENV`]; unset or unknown names fall back to
/// `info`.
pub fn level_from_env() -> Level {
    Level::named(&env_or(LOG_LEVEL_ENV, "info")).unwrap_or(Level::Info)
}
