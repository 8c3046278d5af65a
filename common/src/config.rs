//! Environment variable parsing helpers
//!
//! Everything the init hook knows about its surroundings arrives through the
//! process environment, so configuration is read with these helpers only.

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults, required values,
/// list values and type parsing.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let uri = String::env_or("MONGO_INIT_URI", "mongodb://localhost:27017");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }

    /// Get a required environment variable.
    ///
    /// Unset and empty values are both treated as missing.
    ///
    /// # Example
    /// ```ignore
    /// let user = String::env_required("MONGO_INITDB_ROOT_USERNAME")?;
    /// ```
    fn env_required(name: &str) -> Result<String> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(anyhow!("{} must be set", name)),
        }
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let timeout: u64 = u64::env_parse("MONGO_INIT_SERVER_SELECTION_TIMEOUT", 30);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a comma-separated environment variable as a list.
    ///
    /// Entries are trimmed, blanks dropped and duplicates removed (first one wins).
    /// Falls back to `default` when the variable is unset.
    fn env_list(name: &str, default: &str) -> Vec<String> {
        split_list(&env::var(name).unwrap_or_else(|_| default.to_string()))
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

/// Split a comma-separated value into trimmed, unique, non-empty entries.
fn split_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}
