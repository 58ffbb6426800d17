//! Scheduling-conflict engine.
//!
//! Pure interval algebra over stored events:
//! - Overlap test and conflict detection for a candidate interval
//! - Free-slot suggestion near a requested time
//! - Forward search for the next slot that fits a duration
//! - Largest free slot within a range
//!
//! Nothing in this module touches persistence or the wall clock; every
//! function is deterministic given its inputs.

mod search;

pub use search::{
    calculate_free_time_between_events, find_largest_free_slot, find_next_available_slot,
    suggest_available_slots,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Default search window for slot suggestion (24 hours, centered on the
/// requested start).
pub const DEFAULT_SEARCH_WINDOW_MINUTES: i64 = 24 * 60;

/// Default maximum number of suggested slots.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// A free time slot.
///
/// Like every interval in this crate, a slot is half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// share at least one instant.
///
/// Touching endpoints do not overlap: an event ending at 10:00 never
/// conflicts with one starting at 10:00. This is the only overlap formula
/// in the crate; every conflict answer goes through it.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Find every existing event that overlaps the candidate interval.
///
/// Returns copies of the conflicting events in the order they appear in
/// `existing`.
pub fn detect_conflicts(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    existing: &[Event],
) -> Vec<Event> {
    existing
        .iter()
        .filter(|e| overlaps(candidate_start, candidate_end, e.start_time, e.end_time))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// Fixed origin for interval tests; offsets are minutes from here.
    pub fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
    }

    pub fn at(minutes: i64) -> DateTime<Utc> {
        base() + Duration::minutes(minutes)
    }

    pub fn event(id: &str, start_min: i64, end_min: i64) -> Event {
        Event {
            id: id.to_string(),
            title: format!("event {id}"),
            start_time: at(start_min),
            end_time: at(end_min),
            location: None,
            description: None,
            color: None,
            reminder_minutes: None,
            recurring: None,
            created_at: base(),
            updated_at: base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{at, event};
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn touching_endpoints_do_not_overlap() {
        // [09:00, 10:00) then [10:00, 11:00), both argument orders.
        assert!(!overlaps(at(540), at(600), at(600), at(660)));
        assert!(!overlaps(at(600), at(660), at(540), at(600)));
    }

    #[test]
    fn partial_and_containing_overlaps_are_detected() {
        // Partial: [09:00, 10:00) vs [09:30, 10:30).
        assert!(overlaps(at(540), at(600), at(570), at(630)));
        // Containment: [09:00, 12:00) vs [10:00, 11:00).
        assert!(overlaps(at(540), at(720), at(600), at(660)));
        assert!(overlaps(at(600), at(660), at(540), at(720)));
        // Disjoint.
        assert!(!overlaps(at(540), at(600), at(660), at(720)));
    }

    #[test]
    fn interval_overlaps_itself_when_nonempty() {
        assert!(overlaps(at(540), at(600), at(540), at(600)));
    }

    #[test]
    fn no_existing_events_means_no_conflicts() {
        assert!(detect_conflicts(at(540), at(600), &[]).is_empty());
    }

    #[test]
    fn half_hour_shift_conflicts() {
        // A = [09:00, 10:00), candidate B = [09:30, 10:30) -> [A].
        let a = event("a", 540, 600);
        let conflicts = detect_conflicts(at(570), at(630), &[a.clone()]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "a");

        // Shifting B to start exactly at A's end clears the conflict.
        assert!(detect_conflicts(at(600), at(660), &[a]).is_empty());
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            a_start in 0i64..10_000,
            a_len in 1i64..500,
            b_start in 0i64..10_000,
            b_len in 1i64..500,
        ) {
            let lhs = overlaps(at(a_start), at(a_start + a_len), at(b_start), at(b_start + b_len));
            let rhs = overlaps(at(b_start), at(b_start + b_len), at(a_start), at(a_start + a_len));
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn positive_intervals_overlap_themselves(
            start in 0i64..10_000,
            len in 1i64..500,
        ) {
            prop_assert!(overlaps(at(start), at(start + len), at(start), at(start + len)));
        }
    }
}
