//! Singleton configuration records kept in the event store.
//!
//! Both records live under fixed keys; reads never come back empty --
//! a missing or unreadable row yields the documented defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed store key of the [`Settings`] singleton.
pub const SETTINGS_KEY: &str = "global_settings";

/// Fixed store key of the [`ReminderPreferences`] singleton.
pub const REMINDER_PREFERENCES_KEY: &str = "reminder_preferences";

/// Calendar display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_settings_id")]
    pub id: String,
    /// Initial calendar view: "month", "week" or "day".
    #[serde(default = "default_view")]
    pub default_view: String,
    /// 0 = Sunday .. 6 = Saturday.
    #[serde(default)]
    pub first_day_of_week: u8,
    #[serde(default)]
    pub show_week_numbers: bool,
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u8,
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u8,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reminder preferences. Delivery itself is out of scope; these are the
/// stored knobs a notification layer would read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPreferences {
    #[serde(default = "default_preferences_id")]
    pub id: String,
    /// Minutes before an event's start to remind by default.
    #[serde(rename = "defaultReminder", default = "default_reminder_minutes")]
    pub default_reminder_minutes: u32,
    #[serde(default = "default_notification_sound")]
    pub notification_sound: String,
    #[serde(default = "default_notification_style")]
    pub notification_style: String,
    #[serde(default = "default_true")]
    pub desktop_notifications: bool,
    #[serde(default)]
    pub email_notifications: bool,
    /// Offered reminder offsets, in minutes.
    #[serde(default = "default_reminder_times")]
    pub reminder_times: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_settings_id() -> String {
    SETTINGS_KEY.to_string()
}
fn default_preferences_id() -> String {
    REMINDER_PREFERENCES_KEY.to_string()
}
fn default_view() -> String {
    "month".to_string()
}
fn default_day_start_hour() -> u8 {
    8
}
fn default_day_end_hour() -> u8 {
    20
}
fn default_date_format() -> String {
    "MM/dd/yyyy".to_string()
}
fn default_time_format() -> String {
    "h:mm a".to_string()
}
fn default_reminder_minutes() -> u32 {
    30
}
fn default_notification_sound() -> String {
    "default".to_string()
}
fn default_notification_style() -> String {
    "banner".to_string()
}
fn default_true() -> bool {
    true
}
fn default_reminder_times() -> Vec<u32> {
    vec![5, 15, 30, 60, 1440]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: default_settings_id(),
            default_view: default_view(),
            first_day_of_week: 0,
            show_week_numbers: false,
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            updated_at: None,
        }
    }
}

impl Default for ReminderPreferences {
    fn default() -> Self {
        Self {
            id: default_preferences_id(),
            default_reminder_minutes: default_reminder_minutes(),
            notification_sound: default_notification_sound(),
            notification_style: default_notification_style(),
            desktop_notifications: true,
            email_notifications: false,
            reminder_times: default_reminder_times(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_are_documented_values() {
        let s = Settings::default();
        assert_eq!(s.id, "global_settings");
        assert_eq!(s.default_view, "month");
        assert_eq!(s.first_day_of_week, 0);
        assert_eq!(s.day_start_hour, 8);
        assert_eq!(s.day_end_hour, 20);
        assert_eq!(s.date_format, "MM/dd/yyyy");
        assert_eq!(s.time_format, "h:mm a");
    }

    #[test]
    fn reminder_defaults_are_documented_values() {
        let p = ReminderPreferences::default();
        assert_eq!(p.id, "reminder_preferences");
        assert_eq!(p.default_reminder_minutes, 30);
        assert!(p.desktop_notifications);
        assert!(!p.email_notifications);
        assert_eq!(p.reminder_times, vec![5, 15, 30, 60, 1440]);
    }

    #[test]
    fn empty_json_object_deserializes_to_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
        let p: ReminderPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(p, ReminderPreferences::default());
    }

    #[test]
    fn wire_shape_uses_legacy_field_names() {
        let json = serde_json::to_value(ReminderPreferences::default()).unwrap();
        assert!(json.get("defaultReminder").is_some());
        assert!(json.get("reminderTimes").is_some());
    }
}
