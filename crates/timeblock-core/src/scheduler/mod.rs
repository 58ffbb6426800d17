//! Scheduling service: the conflict-checked save path.
//!
//! This is the single mutation entry point external collaborators use
//! (CLI, UI, natural-language capture). The service acquires the store
//! handle at construction and holds it for its lifetime, composing the
//! conflict engine with the event store:
//! - Validate the candidate draft
//! - Detect conflicts against current events, excluding the candidate's
//!   own id when updating, inside the store's write transaction
//! - On conflict return the overlapping events plus ranked alternative
//!   slots -- nothing is written
//! - Otherwise persist and return the saved record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::{
    find_largest_free_slot, find_next_available_slot, Slot, DEFAULT_MAX_SUGGESTIONS,
    DEFAULT_SEARCH_WINDOW_MINUTES,
};
use crate::error::Result;
use crate::event::{Event, EventDraft, PastEvent};
use crate::storage::{Config, DeleteOutcome, EventDb, ExportBundle};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Width of the slot-suggestion window, centered on the requested
    /// start (minutes)
    pub search_window_minutes: i64,
    /// Maximum number of suggested slots
    pub max_suggestions: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            search_window_minutes: DEFAULT_SEARCH_WINDOW_MINUTES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        Self {
            search_window_minutes: config.scheduler.search_window_minutes,
            max_suggestions: config.scheduler.max_suggestions,
        }
    }
}

/// A scheduling conflict: the candidate overlaps existing events.
///
/// This is a structured outcome, not an error -- callers distinguish it
/// from hard failures and typically surface the suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConflict {
    /// Existing events overlapping the candidate interval.
    pub conflicts: Vec<Event>,
    /// Free slots that fit the candidate's duration, ranked by distance
    /// from the requested start.
    pub suggestions: Vec<Slot>,
}

/// Outcome of a conflict-checked save.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The event was persisted.
    Saved(Event),
    /// The candidate conflicts; nothing was written.
    Conflict(ScheduleConflict),
}

/// Conflict-checked facade over the event store.
pub struct SchedulingService {
    db: EventDb,
    config: SchedulerConfig,
}

impl SchedulingService {
    /// Create a service over an already-open store with default config.
    pub fn new(db: EventDb) -> Self {
        Self {
            db,
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(db: EventDb, config: SchedulerConfig) -> Self {
        Self { db, config }
    }

    /// Open the default store and application config.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let config = Config::load();
        Ok(Self::with_config(
            EventDb::open()?,
            SchedulerConfig::from(&config),
        ))
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &EventDb {
        &self.db
    }

    /// Save a candidate event, refusing to double-book.
    ///
    /// # Errors
    /// `Validation` for a malformed draft, `NotFound` when updating an
    /// unknown id. A conflict is NOT an error; see [`SaveOutcome`].
    pub fn save_event(&self, draft: &EventDraft) -> Result<SaveOutcome> {
        self.db.save_event_guarded(
            draft,
            self.config.search_window_minutes,
            self.config.max_suggestions,
        )
    }

    /// Delete an event, archiving it first when already elapsed.
    pub fn delete_event(&self, id: &str) -> Result<DeleteOutcome> {
        self.db.delete_event(id, Utc::now())
    }

    /// Events touching the given range.
    pub fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        self.db.events_in_range(start, end)
    }

    /// Archived events whose start falls in the given range.
    pub fn past_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PastEvent>> {
        self.db.past_events_in_range(start, end)
    }

    /// First free slot of the given duration at or after `after`.
    pub fn find_slot(&self, after: DateTime<Utc>, duration_minutes: i64) -> Result<Slot> {
        Ok(find_next_available_slot(
            after,
            duration_minutes,
            &self.db.all_events()?,
        ))
    }

    /// Largest free slot within a range, if any.
    pub fn largest_free_slot(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Option<Slot>> {
        Ok(find_largest_free_slot(
            range_start,
            range_end,
            &self.db.all_events()?,
        ))
    }

    /// Export every store as one transferable bundle.
    pub fn export(&self) -> Result<ExportBundle> {
        self.db.export_all(Utc::now())
    }

    /// Replace the store contents with a bundle.
    pub fn import(&self, bundle: &ExportBundle) -> Result<()> {
        self.db.import_all(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn draft(title: &str, start_min: i64, end_min: i64) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            start_time: at(start_min).to_rfc3339(),
            end_time: at(end_min).to_rfc3339(),
            ..Default::default()
        }
    }

    fn service() -> SchedulingService {
        SchedulingService::new(EventDb::open_memory().unwrap())
    }

    fn expect_saved(outcome: SaveOutcome) -> Event {
        match outcome {
            SaveOutcome::Saved(event) => event,
            SaveOutcome::Conflict(c) => panic!("unexpected conflict: {:?}", c.conflicts),
        }
    }

    #[test]
    fn conflicting_save_writes_nothing_and_suggests_alternatives() {
        let svc = service();
        let a = expect_saved(svc.save_event(&draft("A", 540, 600)).unwrap());

        // B = [09:30, 10:30) against A = [09:00, 10:00).
        let outcome = svc.save_event(&draft("B", 570, 630)).unwrap();
        let conflict = match outcome {
            SaveOutcome::Conflict(c) => c,
            SaveOutcome::Saved(_) => panic!("expected a conflict"),
        };
        assert_eq!(conflict.conflicts.len(), 1);
        assert_eq!(conflict.conflicts[0].id, a.id);
        assert_eq!(conflict.suggestions[0].start, at(600));
        assert!(conflict
            .suggestions
            .iter()
            .all(|s| s.duration_minutes() >= 60));

        // The rejected candidate was not persisted.
        assert_eq!(svc.store().all_events().unwrap().len(), 1);
    }

    #[test]
    fn touching_events_save_cleanly() {
        let svc = service();
        expect_saved(svc.save_event(&draft("A", 540, 600)).unwrap());
        expect_saved(svc.save_event(&draft("B", 600, 660)).unwrap());
        assert_eq!(svc.store().all_events().unwrap().len(), 2);
    }

    #[test]
    fn update_excludes_its_own_interval_from_the_check() {
        let svc = service();
        let event = expect_saved(svc.save_event(&draft("A", 540, 600)).unwrap());

        // Shift A half an hour; it overlaps its own old slot only.
        let mut update = draft("A", 570, 630);
        update.id = Some(event.id.clone());
        let moved = expect_saved(svc.save_event(&update).unwrap());
        assert_eq!(moved.id, event.id);
        assert_eq!(moved.start_time, at(570));
    }

    #[test]
    fn update_still_conflicts_with_other_events() {
        let svc = service();
        expect_saved(svc.save_event(&draft("A", 540, 600)).unwrap());
        let b = expect_saved(svc.save_event(&draft("B", 660, 720)).unwrap());

        let mut update = draft("B", 570, 630);
        update.id = Some(b.id);
        assert!(matches!(
            svc.save_event(&update).unwrap(),
            SaveOutcome::Conflict(_)
        ));
    }

    #[test]
    fn invalid_draft_is_an_error_not_a_conflict() {
        let svc = service();
        assert!(matches!(
            svc.save_event(&draft("", 540, 600)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn delete_of_unknown_id_propagates_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete_event("missing"),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn find_slot_skips_stored_events() {
        let svc = service();
        expect_saved(svc.save_event(&draft("A", 540, 600)).unwrap());
        let slot = svc.find_slot(at(540), 30).unwrap();
        assert_eq!(slot.start, at(600));
    }
}
