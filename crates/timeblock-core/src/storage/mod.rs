mod config;
pub mod event_db;
pub mod migrations;

pub use config::Config;
pub use event_db::{DeleteOutcome, EventDb, ExportBundle};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory holding the database and config file.
///
/// `TIMEBLOCK_DATA_DIR` overrides the location entirely (used by tests
/// and scripts). Otherwise `~/.config/timeblock[-dev]/` based on
/// TIMEBLOCK_ENV; set TIMEBLOCK_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(custom) = std::env::var("TIMEBLOCK_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TIMEBLOCK_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("timeblock-dev")
        } else {
            base_dir.join("timeblock")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
