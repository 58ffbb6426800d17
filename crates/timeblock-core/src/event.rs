//! Event model: persisted records and the draft type collaborators submit.
//!
//! Drafts arrive with RFC 3339 time strings (the UI and natural-language
//! layers produce best-effort candidates); [`EventDraft::validate`] parses
//! and checks them exactly once. Persisted [`Event`] records always carry
//! a store-assigned id and timestamps.
//!
//! Wire field names are camelCase to match the persisted record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Repetition unit of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// Declarative repetition rule attached to an event.
///
/// The pattern is stored as declared; it is never expanded into concrete
/// occurrences by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceSpec {
    pub unit: RecurrenceUnit,
    /// Repeat every `interval` units. Must be >= 1.
    pub interval: u32,
    /// Optional pinned weekday, 0 = Sunday .. 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
}

/// Derived recurrence record, zero-or-one per event.
///
/// Its lifecycle is entirely driven by the owning event's save/delete;
/// nothing creates or removes one directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    pub id: String,
    pub event_id: String,
    pub pattern: RecurrenceSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted calendar event.
///
/// The store exclusively owns the canonical record; every `Event` handed
/// out is a copy. Invariant: `start_time < end_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Minutes before start_time to fire a reminder (delivery is out of
    /// scope for this crate).
    #[serde(rename = "reminder", default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurrenceSpec>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Immutable snapshot of an elapsed event, created on deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastEvent {
    #[serde(flatten)]
    pub event: Event,
    pub archived_at: DateTime<Utc>,
}

/// Candidate event submitted by collaborators (UI, natural-language
/// extraction, CLI).
///
/// `id` absent means create; present means update. Any optional field may
/// be absent. Time strings are RFC 3339 and validated by
/// [`EventDraft::validate`] -- the store refuses to write a draft that has
/// not passed that check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "reminder", default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurrenceSpec>,
}

impl EventDraft {
    /// Build a draft that re-submits an existing record (update path).
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            start_time: event.start_time.to_rfc3339(),
            end_time: event.end_time.to_rfc3339(),
            location: event.location.clone(),
            description: event.description.clone(),
            color: event.color.clone(),
            reminder_minutes: event.reminder_minutes,
            recurring: event.recurring.clone(),
        }
    }

    /// Validate the draft and return the parsed `(start, end)` interval.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyTitle`] for a missing/blank title
    /// - [`ValidationError::UnparseableTime`] for a bad time string
    /// - [`ValidationError::InvalidTimeRange`] when start >= end
    /// - [`ValidationError::InvalidValue`] for a zero recurrence interval
    ///   or an out-of-range day_of_week
    pub fn validate(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let start = parse_instant("start", &self.start_time)?;
        let end = parse_instant("end", &self.end_time)?;

        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }

        if let Some(spec) = &self.recurring {
            if spec.interval == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "recurring.interval",
                    message: "must be a positive integer".to_string(),
                });
            }
            if let Some(day) = spec.day_of_week {
                if day > 6 {
                    return Err(ValidationError::InvalidValue {
                        field: "recurring.dayOfWeek",
                        message: format!("{day} is out of range 0..=6"),
                    });
                }
            }
        }

        Ok((start, end))
    }
}

/// Parse an RFC 3339 time string into a UTC instant.
fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::UnparseableTime {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, start: &str, end: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_draft_parses_interval() {
        let d = draft("Standup", "2026-03-02T09:00:00Z", "2026-03-02T09:15:00Z");
        let (start, end) = d.validate().unwrap();
        assert_eq!((end - start).num_minutes(), 15);
    }

    #[test]
    fn blank_title_is_rejected() {
        let d = draft("   ", "2026-03-02T09:00:00Z", "2026-03-02T10:00:00Z");
        assert!(matches!(d.validate(), Err(ValidationError::EmptyTitle)));
    }

    #[test]
    fn unparseable_time_is_rejected() {
        let d = draft("Standup", "tomorrow-ish", "2026-03-02T10:00:00Z");
        assert!(matches!(
            d.validate(),
            Err(ValidationError::UnparseableTime { field: "start", .. })
        ));
    }

    #[test]
    fn inverted_and_zero_length_ranges_are_rejected() {
        let d = draft("Standup", "2026-03-02T10:00:00Z", "2026-03-02T09:00:00Z");
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));

        let d = draft("Standup", "2026-03-02T09:00:00Z", "2026-03-02T09:00:00Z");
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn zero_recurrence_interval_is_rejected() {
        let mut d = draft("Gym", "2026-03-02T18:00:00Z", "2026-03-02T19:00:00Z");
        d.recurring = Some(RecurrenceSpec {
            unit: RecurrenceUnit::Weeks,
            interval: 0,
            day_of_week: None,
        });
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidValue {
                field: "recurring.interval",
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_day_of_week_is_rejected() {
        let mut d = draft("Gym", "2026-03-02T18:00:00Z", "2026-03-02T19:00:00Z");
        d.recurring = Some(RecurrenceSpec {
            unit: RecurrenceUnit::Weeks,
            interval: 1,
            day_of_week: Some(7),
        });
        assert!(matches!(
            d.validate(),
            Err(ValidationError::InvalidValue {
                field: "recurring.dayOfWeek",
                ..
            })
        ));
    }

    #[test]
    fn offset_times_normalize_to_utc() {
        let d = draft("Call", "2026-03-02T10:00:00+02:00", "2026-03-02T11:00:00+02:00");
        let (start, _) = d.validate().unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-02T08:00:00+00:00");
    }

    #[test]
    fn event_wire_shape_is_camel_case() {
        let d = draft("Standup", "2026-03-02T09:00:00Z", "2026-03-02T09:15:00Z");
        let json = serde_json::to_value(&d).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("endTime").is_some());
        assert!(json.get("start_time").is_none());
    }
}
