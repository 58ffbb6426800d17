//! Gap-search algorithms over sorted events.
//!
//! All searches share the same sweep: events sorted ascending by start, a
//! cursor tracking the end of covered time, gaps read off between the
//! cursor and the next event's start.

use chrono::{DateTime, Duration, Utc};

use crate::event::Event;

use super::Slot;

/// Suggest free slots near a requested start time.
///
/// The search window is `[requested_start - w/2, requested_start + w/2)`
/// where `w` is `search_window_minutes`. Each gap of at least
/// `duration_minutes` yields one candidate starting at the gap start, its
/// end clamped to the gap end. Candidates are ranked by how close they
/// start to the requested time (ties: earlier slot first) and truncated
/// to `max_results`.
pub fn suggest_available_slots(
    requested_start: DateTime<Utc>,
    duration_minutes: i64,
    existing: &[Event],
    search_window_minutes: i64,
    max_results: usize,
) -> Vec<Slot> {
    let window_start = requested_start - Duration::minutes(search_window_minutes / 2);
    let window_end = requested_start + Duration::minutes(search_window_minutes / 2);

    let mut sorted: Vec<&Event> = existing.iter().collect();
    sorted.sort_by_key(|e| e.start_time);

    let mut slots = Vec::new();
    let mut cursor = window_start;

    for event in sorted {
        if event.end_time <= cursor {
            continue;
        }
        if event.start_time >= window_end {
            break;
        }
        if event.start_time > cursor {
            push_candidate(&mut slots, cursor, event.start_time, duration_minutes);
        }
        if event.end_time > cursor {
            cursor = event.end_time;
        }
    }

    if cursor < window_end {
        push_candidate(&mut slots, cursor, window_end, duration_minutes);
    }

    slots.sort_by(|a, b| {
        let dist_a = (a.start - requested_start).abs();
        let dist_b = (b.start - requested_start).abs();
        dist_a.cmp(&dist_b).then(a.start.cmp(&b.start))
    });
    slots.truncate(max_results);
    slots
}

/// Emit a candidate slot for the gap `[gap_start, gap_end)` if it can fit
/// the requested duration.
fn push_candidate(
    slots: &mut Vec<Slot>,
    gap_start: DateTime<Utc>,
    gap_end: DateTime<Utc>,
    duration_minutes: i64,
) {
    if (gap_end - gap_start).num_minutes() >= duration_minutes {
        let slot_end = (gap_start + Duration::minutes(duration_minutes)).min(gap_end);
        slots.push(Slot::new(gap_start, slot_end));
    }
}

/// Find the first slot of `duration_minutes` at or after `after`.
///
/// Scans sorted events forward; the first gap that fits wins. When no gap
/// between events fits, the slot starts right after the last event's end,
/// so a slot is always returned -- the search is open-ended forward.
pub fn find_next_available_slot(
    after: DateTime<Utc>,
    duration_minutes: i64,
    existing: &[Event],
) -> Slot {
    let mut sorted: Vec<&Event> = existing.iter().collect();
    sorted.sort_by_key(|e| e.start_time);

    let duration = Duration::minutes(duration_minutes);
    let mut cursor = after;

    for event in sorted {
        if event.end_time <= cursor {
            continue;
        }
        // Half-open intervals: a slot may touch the next event's start.
        if event.start_time > cursor && cursor + duration <= event.start_time {
            return Slot::new(cursor, cursor + duration);
        }
        if event.end_time > cursor {
            cursor = event.end_time;
        }
    }

    Slot::new(cursor, cursor + duration)
}

/// Minutes of free time between two events, in the given order.
///
/// Returns 0 (not an error) when the events overlap or are out of order.
pub fn calculate_free_time_between_events(earlier: &Event, later: &Event) -> i64 {
    (later.start_time - earlier.end_time).num_minutes().max(0)
}

/// Find the largest free slot within `[range_start, range_end)`.
///
/// Single linear scan over sorted events, including the gap before the
/// first event and after the last. Returns `None` when no positive-length
/// gap exists. Equal-length gaps resolve to the earliest.
pub fn find_largest_free_slot(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    existing: &[Event],
) -> Option<Slot> {
    let mut sorted: Vec<&Event> = existing.iter().collect();
    sorted.sort_by_key(|e| e.start_time);

    let mut best: Option<Slot> = None;
    let mut cursor = range_start;

    for event in sorted {
        if event.end_time <= cursor {
            continue;
        }
        if event.start_time >= range_end {
            break;
        }
        if event.start_time > cursor {
            consider(&mut best, Slot::new(cursor, event.start_time));
        }
        if event.end_time > cursor {
            cursor = event.end_time;
        }
    }

    if cursor < range_end {
        consider(&mut best, Slot::new(cursor, range_end));
    }

    best
}

fn consider(best: &mut Option<Slot>, candidate: Slot) {
    if candidate.end <= candidate.start {
        return;
    }
    let beats = match best {
        Some(current) => candidate.end - candidate.start > current.end - current.start,
        None => true,
    };
    if beats {
        *best = Some(candidate);
    }
}
