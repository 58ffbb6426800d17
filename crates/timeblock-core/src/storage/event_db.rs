//! SQLite-based event store.
//!
//! Provides persistent storage for:
//! - Live events and their derived recurrence records
//! - Archived past events (snapshots taken on deletion)
//! - Singleton configuration records (settings, reminder preferences)
//!
//! One `EventDb` owns one connection for its whole lifetime; every
//! mutating operation runs in a single `BEGIN IMMEDIATE` transaction, so
//! an event and its recurrence record commit together or not at all.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::conflict::{detect_conflicts, suggest_available_slots};
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::event::{Event, EventDraft, PastEvent, RecurrencePattern, RecurrenceSpec, RecurrenceUnit};
use crate::scheduler::{SaveOutcome, ScheduleConflict};
use crate::settings::{ReminderPreferences, Settings, REMINDER_PREFERENCES_KEY, SETTINGS_KEY};

// === Helper Functions ===

/// Format recurrence unit for database storage
fn format_recurrence_unit(unit: RecurrenceUnit) -> &'static str {
    match unit {
        RecurrenceUnit::Days => "days",
        RecurrenceUnit::Weeks => "weeks",
        RecurrenceUnit::Months => "months",
        RecurrenceUnit::Years => "years",
    }
}

/// Parse recurrence unit from database string
fn parse_recurrence_unit(unit_str: &str) -> RecurrenceUnit {
    match unit_str {
        "weeks" => RecurrenceUnit::Weeks,
        "months" => RecurrenceUnit::Months,
        "years" => RecurrenceUnit::Years,
        _ => RecurrenceUnit::Days,
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

const EVENT_COLUMNS: &str = "id, title, start_time, end_time, location, description, color,
                             reminder_minutes, recurring, created_at, updated_at";

/// Build an Event from a database row (column order per EVENT_COLUMNS)
fn row_to_event(row: &rusqlite::Row) -> Result<Event, rusqlite::Error> {
    let recurring_json: Option<String> = row.get(8)?;
    let recurring: Option<RecurrenceSpec> =
        recurring_json.and_then(|json| serde_json::from_str(&json).ok());

    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        start_time: parse_datetime_fallback(&row.get::<_, String>(2)?),
        end_time: parse_datetime_fallback(&row.get::<_, String>(3)?),
        location: row.get(4)?,
        description: row.get(5)?,
        color: row.get(6)?,
        reminder_minutes: row.get(7)?,
        recurring,
        created_at: parse_datetime_fallback(&row.get::<_, String>(9)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(10)?),
    })
}

/// Build a RecurrencePattern from a database row
fn row_to_pattern(row: &rusqlite::Row) -> Result<RecurrencePattern, rusqlite::Error> {
    let unit_str: String = row.get(2)?;
    Ok(RecurrencePattern {
        id: row.get(0)?,
        event_id: row.get(1)?,
        pattern: RecurrenceSpec {
            unit: parse_recurrence_unit(&unit_str),
            interval: row.get(3)?,
            day_of_week: row.get(4)?,
        },
        created_at: parse_datetime_fallback(&row.get::<_, String>(5)?),
        updated_at: parse_datetime_fallback(&row.get::<_, String>(6)?),
    })
}

/// Outcome of deleting an event.
///
/// Archival failure is a report, not an error: an elapsed event whose
/// snapshot could not be written is still deleted.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// The record as it was at deletion time.
    pub event: Event,
    /// Whether a PastEvent snapshot was written.
    pub archived: bool,
    /// Set when the event was elapsed but the snapshot failed.
    pub archival_error: Option<StorageError>,
}

/// Transferable snapshot of every store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub events: Vec<Event>,
    #[serde(default)]
    pub past_events: Vec<PastEvent>,
    #[serde(default)]
    pub recurring_patterns: Vec<RecurrencePattern>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub reminder_preferences: ReminderPreferences,
    pub export_date: DateTime<Utc>,
}

impl ExportBundle {
    /// Serialize the bundle to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a bundle, failing with a validation error on any shape
    /// mismatch (most importantly a missing/malformed events collection).
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::MalformedImport(e.to_string()))
    }
}

/// SQLite database for calendar storage.
///
/// The handle is acquired once and reused for every operation; callers
/// hold it for the lifetime of the owning service.
pub struct EventDb {
    conn: Connection,
}

impl EventDb {
    /// Open the database at `<data_dir>/timeblock.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("timeblock.db"))
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, throwaway previews).
    pub fn open_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS events (
                    id               TEXT PRIMARY KEY,
                    title            TEXT NOT NULL,
                    start_time       TEXT NOT NULL,
                    end_time         TEXT NOT NULL,
                    location         TEXT,
                    description      TEXT,
                    color            TEXT,
                    reminder_minutes INTEGER,
                    recurring        TEXT,
                    created_at       TEXT NOT NULL,
                    updated_at       TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS recurring_patterns (
                    id          TEXT PRIMARY KEY,
                    event_id    TEXT NOT NULL UNIQUE,
                    unit        TEXT NOT NULL,
                    interval    INTEGER NOT NULL,
                    day_of_week INTEGER,
                    created_at  TEXT NOT NULL,
                    updated_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS past_events (
                    id               TEXT PRIMARY KEY,
                    title            TEXT NOT NULL,
                    start_time       TEXT NOT NULL,
                    end_time         TEXT NOT NULL,
                    location         TEXT,
                    description      TEXT,
                    color            TEXT,
                    reminder_minutes INTEGER,
                    recurring        TEXT,
                    created_at       TEXT NOT NULL,
                    updated_at       TEXT NOT NULL,
                    archived_at      TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS singletons (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Indexes matching the common query patterns
                CREATE INDEX IF NOT EXISTS idx_events_start_time ON events(start_time);
                CREATE INDEX IF NOT EXISTS idx_events_end_time ON events(end_time);
                CREATE INDEX IF NOT EXISTS idx_recurring_patterns_event_id
                    ON recurring_patterns(event_id);
                CREATE INDEX IF NOT EXISTS idx_past_events_start_time
                    ON past_events(start_time);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        migrations::migrate(&self.conn)
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        Ok(())
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction, committing on Ok
    /// and rolling back on Err.
    fn write_txn<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    // === Event CRUD ===

    /// Save an event: create when the draft has no id, update otherwise.
    ///
    /// Validation runs before any mutation, so a failed save leaves the
    /// store untouched. On success the event's recurrence record is
    /// synchronized in the same transaction. This variant performs no
    /// conflict checking; see [`EventDb::save_event_guarded`].
    ///
    /// # Errors
    /// `Validation` for a bad draft, `NotFound` when updating an unknown
    /// id.
    pub fn save_event(&self, draft: &EventDraft) -> Result<Event> {
        let (start, end) = draft.validate()?;
        self.write_txn(|| self.persist_event(draft, start, end))
    }

    /// Save an event with the conflict check folded into the write
    /// transaction.
    ///
    /// The check and the write happen under one `BEGIN IMMEDIATE`, so no
    /// other writer on the same store can slip a conflicting event in
    /// between. When updating, the event's own id is excluded from the
    /// check. On conflict nothing is written and the outcome carries the
    /// conflicting events plus ranked alternative slots.
    pub fn save_event_guarded(
        &self,
        draft: &EventDraft,
        search_window_minutes: i64,
        max_suggestions: usize,
    ) -> Result<SaveOutcome> {
        let (start, end) = draft.validate()?;
        self.write_txn(|| {
            let existing = match draft.id.as_deref() {
                Some(id) => self.all_events_except(id)?,
                None => self.all_events()?,
            };

            let conflicts = detect_conflicts(start, end, &existing);
            if !conflicts.is_empty() {
                let suggestions = suggest_available_slots(
                    start,
                    (end - start).num_minutes(),
                    &existing,
                    search_window_minutes,
                    max_suggestions,
                );
                return Ok(SaveOutcome::Conflict(ScheduleConflict {
                    conflicts,
                    suggestions,
                }));
            }

            Ok(SaveOutcome::Saved(self.persist_event(draft, start, end)?))
        })
    }

    /// Write a validated draft. Caller holds the transaction.
    fn persist_event(
        &self,
        draft: &EventDraft,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Event> {
        let now = Utc::now();

        let event = match draft.id.as_deref() {
            Some(id) => {
                let existing = self
                    .get_event(id)?
                    .ok_or_else(|| CoreError::not_found("event", id))?;
                let event = Event {
                    id: id.to_string(),
                    title: draft.title.clone(),
                    start_time: start,
                    end_time: end,
                    location: draft.location.clone(),
                    description: draft.description.clone(),
                    color: draft.color.clone(),
                    reminder_minutes: draft.reminder_minutes,
                    recurring: draft.recurring.clone(),
                    created_at: existing.created_at,
                    updated_at: now,
                };
                self.update_event_row(&event)?;
                event
            }
            None => {
                let event = Event {
                    id: Uuid::new_v4().to_string(),
                    title: draft.title.clone(),
                    start_time: start,
                    end_time: end,
                    location: draft.location.clone(),
                    description: draft.description.clone(),
                    color: draft.color.clone(),
                    reminder_minutes: draft.reminder_minutes,
                    recurring: draft.recurring.clone(),
                    created_at: now,
                    updated_at: now,
                };
                self.insert_event_row(&event)?;
                event
            }
        };

        self.sync_recurrence(&event, now)?;
        Ok(event)
    }

    fn insert_event_row(&self, event: &Event) -> Result<()> {
        let recurring_json = event
            .recurring
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn.execute(
            "INSERT INTO events (id, title, start_time, end_time, location, description,
                                 color, reminder_minutes, recurring, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                event.id,
                event.title,
                event.start_time.to_rfc3339(),
                event.end_time.to_rfc3339(),
                event.location,
                event.description,
                event.color,
                event.reminder_minutes,
                recurring_json,
                event.created_at.to_rfc3339(),
                event.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_event_row(&self, event: &Event) -> Result<()> {
        let recurring_json = event
            .recurring
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn.execute(
            "UPDATE events
             SET title = ?1, start_time = ?2, end_time = ?3, location = ?4,
                 description = ?5, color = ?6, reminder_minutes = ?7, recurring = ?8,
                 updated_at = ?9
             WHERE id = ?10",
            params![
                event.title,
                event.start_time.to_rfc3339(),
                event.end_time.to_rfc3339(),
                event.location,
                event.description,
                event.color,
                event.reminder_minutes,
                recurring_json,
                event.updated_at.to_rfc3339(),
                event.id,
            ],
        )?;
        Ok(())
    }

    /// Bring the recurrence record in line with the event's declared
    /// pattern: upsert when declared (keeping the record's identity on
    /// update), delete when not.
    fn sync_recurrence(&self, event: &Event, now: DateTime<Utc>) -> Result<()> {
        let existing = self.pattern_for_event(&event.id)?;
        match (&event.recurring, existing) {
            (Some(spec), Some(record)) => {
                self.conn.execute(
                    "UPDATE recurring_patterns
                     SET unit = ?1, interval = ?2, day_of_week = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![
                        format_recurrence_unit(spec.unit),
                        spec.interval,
                        spec.day_of_week,
                        now.to_rfc3339(),
                        record.id,
                    ],
                )?;
            }
            (Some(spec), None) => {
                self.insert_pattern_row(&RecurrencePattern {
                    id: Uuid::new_v4().to_string(),
                    event_id: event.id.clone(),
                    pattern: spec.clone(),
                    created_at: now,
                    updated_at: now,
                })?;
            }
            (None, Some(record)) => {
                self.conn.execute(
                    "DELETE FROM recurring_patterns WHERE id = ?1",
                    params![record.id],
                )?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn insert_pattern_row(&self, pattern: &RecurrencePattern) -> Result<()> {
        self.conn.execute(
            "INSERT INTO recurring_patterns
                 (id, event_id, unit, interval, day_of_week, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pattern.id,
                pattern.event_id,
                format_recurrence_unit(pattern.pattern.unit),
                pattern.pattern.interval,
                pattern.pattern.day_of_week,
                pattern.created_at.to_rfc3339(),
                pattern.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an event by id.
    pub fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"
        ))?;
        let result = stmt.query_row(params![id], row_to_event);
        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all events, ordered by start time.
    pub fn all_events(&self) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time ASC"
        ))?;
        let events = stmt.query_map([], row_to_event)?;
        Ok(events.collect::<Result<_, _>>()?)
    }

    /// List all events except the given id (conflict checks on update).
    pub fn all_events_except(&self, id: &str) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id != ?1 ORDER BY start_time ASC"
        ))?;
        let events = stmt.query_map(params![id], row_to_event)?;
        Ok(events.collect::<Result<_, _>>()?)
    }

    /// List events touching `[start, end]`: starting in it, ending in it,
    /// or spanning it entirely.
    pub fn events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE (start_time >= ?1 AND start_time <= ?2)
                OR (end_time >= ?1 AND end_time <= ?2)
                OR (start_time <= ?1 AND end_time >= ?2)
             ORDER BY start_time ASC"
        ))?;
        let events = stmt.query_map(params![start.to_rfc3339(), end.to_rfc3339()], row_to_event)?;
        Ok(events.collect::<Result<_, _>>()?)
    }

    /// Delete an event, archiving it first when it has already elapsed.
    ///
    /// Archival runs outside the delete transaction on purpose: a failed
    /// snapshot is reported in the outcome but never blocks the delete.
    ///
    /// # Errors
    /// `NotFound` when no event has the given id.
    pub fn delete_event(&self, id: &str, now: DateTime<Utc>) -> Result<DeleteOutcome> {
        let event = self
            .get_event(id)?
            .ok_or_else(|| CoreError::not_found("event", id))?;

        let mut archived = false;
        let mut archival_error = None;
        if event.end_time < now {
            match self.insert_past_event_row(&PastEvent {
                event: event.clone(),
                archived_at: now,
            }) {
                Ok(()) => archived = true,
                Err(err) => archival_error = Some(err),
            }
        }

        self.write_txn(|| {
            self.conn.execute(
                "DELETE FROM recurring_patterns WHERE event_id = ?1",
                params![event.id],
            )?;
            self.conn
                .execute("DELETE FROM events WHERE id = ?1", params![event.id])?;
            Ok(())
        })?;

        Ok(DeleteOutcome {
            event,
            archived,
            archival_error,
        })
    }

    // === Past events ===

    fn insert_past_event_row(&self, past: &PastEvent) -> Result<(), StorageError> {
        let recurring_json = past
            .event
            .recurring
            .as_ref()
            .and_then(|spec| serde_json::to_string(spec).ok());
        self.conn
            .execute(
                "INSERT INTO past_events (id, title, start_time, end_time, location,
                     description, color, reminder_minutes, recurring, created_at,
                     updated_at, archived_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    past.event.id,
                    past.event.title,
                    past.event.start_time.to_rfc3339(),
                    past.event.end_time.to_rfc3339(),
                    past.event.location,
                    past.event.description,
                    past.event.color,
                    past.event.reminder_minutes,
                    recurring_json,
                    past.event.created_at.to_rfc3339(),
                    past.event.updated_at.to_rfc3339(),
                    past.archived_at.to_rfc3339(),
                ],
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// List all archived events.
    pub fn past_events(&self) -> Result<Vec<PastEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS}, archived_at FROM past_events ORDER BY start_time ASC"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(PastEvent {
                event: row_to_event(row)?,
                archived_at: parse_datetime_fallback(&row.get::<_, String>(11)?),
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// List archived events starting within `[start, end]`.
    pub fn past_events_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PastEvent>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS}, archived_at FROM past_events
             WHERE start_time >= ?1 AND start_time <= ?2
             ORDER BY start_time ASC"
        ))?;
        let rows = stmt.query_map(params![start.to_rfc3339(), end.to_rfc3339()], |row| {
            Ok(PastEvent {
                event: row_to_event(row)?,
                archived_at: parse_datetime_fallback(&row.get::<_, String>(11)?),
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    // === Recurrence records ===

    /// List all recurrence records.
    pub fn all_patterns(&self) -> Result<Vec<RecurrencePattern>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, unit, interval, day_of_week, created_at, updated_at
             FROM recurring_patterns",
        )?;
        let patterns = stmt.query_map([], row_to_pattern)?;
        Ok(patterns.collect::<Result<_, _>>()?)
    }

    /// Get the recurrence record owned by an event, if any.
    pub fn pattern_for_event(&self, event_id: &str) -> Result<Option<RecurrencePattern>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, unit, interval, day_of_week, created_at, updated_at
             FROM recurring_patterns WHERE event_id = ?1",
        )?;
        let result = stmt.query_row(params![event_id], row_to_pattern);
        match result {
            Ok(pattern) => Ok(Some(pattern)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // === Singletons ===

    fn singleton_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM singletons WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn singleton_put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO singletons (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get the settings record, or the documented defaults when absent
    /// or unreadable.
    pub fn settings(&self) -> Result<Settings> {
        Ok(self
            .singleton_get(SETTINGS_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Store the settings record under its fixed key.
    pub fn save_settings(&self, settings: &Settings) -> Result<Settings> {
        let mut stored = settings.clone();
        stored.id = SETTINGS_KEY.to_string();
        stored.updated_at = Some(Utc::now());
        self.singleton_put(SETTINGS_KEY, &serde_json::to_string(&stored)?)?;
        Ok(stored)
    }

    /// Get the reminder preferences, or the documented defaults when
    /// absent or unreadable.
    pub fn reminder_preferences(&self) -> Result<ReminderPreferences> {
        Ok(self
            .singleton_get(REMINDER_PREFERENCES_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Store the reminder preferences under their fixed key.
    pub fn save_reminder_preferences(
        &self,
        preferences: &ReminderPreferences,
    ) -> Result<ReminderPreferences> {
        let mut stored = preferences.clone();
        stored.id = REMINDER_PREFERENCES_KEY.to_string();
        stored.updated_at = Some(Utc::now());
        self.singleton_put(REMINDER_PREFERENCES_KEY, &serde_json::to_string(&stored)?)?;
        Ok(stored)
    }

    // === Export / Import ===

    /// Bundle every store into one transferable object.
    pub fn export_all(&self, now: DateTime<Utc>) -> Result<ExportBundle> {
        Ok(ExportBundle {
            events: self.all_events()?,
            past_events: self.past_events()?,
            recurring_patterns: self.all_patterns()?,
            settings: self.settings()?,
            reminder_preferences: self.reminder_preferences()?,
            export_date: now,
        })
    }

    /// Replace the entire store contents with a bundle.
    ///
    /// Every event is revalidated through the regular save rules before
    /// anything is touched; ids, timestamps and fields are preserved so a
    /// round-trip reproduces an observationally equal store. Recurrence
    /// records are re-derived from each event's declared pattern (keeping
    /// the bundle record's identity where one matches) so they always
    /// reference live events. Clear and reinsert run in one transaction:
    /// a failed record rolls the whole import back.
    ///
    /// # Errors
    /// `Validation` when any event in the bundle is invalid.
    pub fn import_all(&self, bundle: &ExportBundle) -> Result<()> {
        let mut validated = Vec::with_capacity(bundle.events.len());
        for event in &bundle.events {
            let draft = EventDraft::from_event(event);
            let (start, end) = draft.validate()?;
            validated.push(Event {
                start_time: start,
                end_time: end,
                ..event.clone()
            });
        }

        self.write_txn(|| {
            self.clear_all_locked()?;

            for event in &validated {
                self.insert_event_row(event)?;
                if let Some(spec) = &event.recurring {
                    let carried = bundle
                        .recurring_patterns
                        .iter()
                        .find(|p| p.event_id == event.id);
                    let (id, created_at) = match carried {
                        Some(p) => (p.id.clone(), p.created_at),
                        None => (Uuid::new_v4().to_string(), event.created_at),
                    };
                    self.insert_pattern_row(&RecurrencePattern {
                        id,
                        event_id: event.id.clone(),
                        pattern: spec.clone(),
                        created_at,
                        updated_at: event.updated_at,
                    })?;
                }
            }

            for past in &bundle.past_events {
                self.insert_past_event_row(past)?;
            }

            self.singleton_put(SETTINGS_KEY, &serde_json::to_string(&bundle.settings)?)?;
            self.singleton_put(
                REMINDER_PREFERENCES_KEY,
                &serde_json::to_string(&bundle.reminder_preferences)?,
            )?;

            Ok(())
        })
    }

    /// Empty every store in one transaction.
    pub fn clear_all(&self) -> Result<()> {
        self.write_txn(|| self.clear_all_locked())
    }

    fn clear_all_locked(&self) -> Result<()> {
        self.conn.execute("DELETE FROM recurring_patterns", [])?;
        self.conn.execute("DELETE FROM events", [])?;
        self.conn.execute("DELETE FROM past_events", [])?;
        self.conn.execute("DELETE FROM singletons", [])?;
        Ok(())
    }
}
