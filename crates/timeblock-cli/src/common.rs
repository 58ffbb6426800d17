//! Shared helpers for CLI commands.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use timeblock_core::SchedulingService;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the scheduling service over the default store and config.
pub fn open_service() -> Result<SchedulingService, Box<dyn std::error::Error>> {
    Ok(SchedulingService::open()?)
}

/// Parse a user-supplied time: RFC 3339, or `YYYY-MM-DD HH:MM` read as UTC.
pub fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| format!("unrecognized time '{value}' (use RFC 3339 or \"YYYY-MM-DD HH:MM\")"))
}

/// Short human form for listings.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}
