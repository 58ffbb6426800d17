//! TOML-based application configuration.
//!
//! Holds the scheduling knobs callers rarely change per call:
//! - Slot-suggestion search window
//! - Maximum number of suggested slots
//!
//! Configuration is stored at `<data_dir>/config.toml`. This is distinct
//! from the user-facing calendar settings, which are records in the event
//! store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::conflict::{DEFAULT_MAX_SUGGESTIONS, DEFAULT_SEARCH_WINDOW_MINUTES};
use crate::error::Result;

/// Scheduler-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSection {
    #[serde(default = "default_search_window_minutes")]
    pub search_window_minutes: i64,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

fn default_search_window_minutes() -> i64 {
    DEFAULT_SEARCH_WINDOW_MINUTES
}
fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            search_window_minutes: default_search_window_minutes(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        Self::path()
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|text| toml::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Save the configuration.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(Self::path()?, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_engine_constants() {
        let config = Config::default();
        assert_eq!(config.scheduler.search_window_minutes, 24 * 60);
        assert_eq!(config.scheduler.max_suggestions, 5);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[scheduler]\nmax_suggestions = 3\n").unwrap();
        assert_eq!(config.scheduler.max_suggestions, 3);
        assert_eq!(config.scheduler.search_window_minutes, 24 * 60);
    }
}
