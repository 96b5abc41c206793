use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};

/// Default number of circulation records kept
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Settings for a catalog instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Name shown in greetings and reports
    pub name: String,
    /// Maximum number of circulation records to keep; zero disables history
    pub max_history_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { name: "Library".to_string(), max_history_size: DEFAULT_HISTORY_SIZE }
    }
}

impl CatalogConfig {
    /// Parse a configuration from JSON text, filling absent keys with defaults
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::Config` if the text is not a valid configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LibraryError::Config(format!("Failed to parse JSON: {e}")))
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::Config` if:
    /// - The file cannot be read
    /// - The JSON parsing fails
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            LibraryError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }
}
