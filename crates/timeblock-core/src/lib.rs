//! # Timeblock Core Library
//!
//! Core business logic for the Timeblock calendar. The CLI binary and any
//! GUI shell are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Event Model**: validated event records; candidates arrive as
//!   [`EventDraft`]s from collaborators (UI, natural-language capture)
//! - **Conflict Engine**: pure half-open interval algebra -- overlap
//!   detection and free-slot search, no persistence access
//! - **Event Store**: SQLite-backed storage for events, derived
//!   recurrence records, archived past events and singleton settings
//! - **Scheduling Service**: composes engine and store into the
//!   conflict-checked save that is the only external mutation path
//!
//! ## Key Components
//!
//! - [`SchedulingService`]: conflict-checked save, delete with archival
//! - [`EventDb`]: persistent store handle
//! - [`conflict`]: slot search over sorted events

pub mod conflict;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod settings;
pub mod storage;

pub use conflict::{
    calculate_free_time_between_events, detect_conflicts, find_largest_free_slot,
    find_next_available_slot, overlaps, suggest_available_slots, Slot,
};
pub use error::{CoreError, Result, StorageError, ValidationError};
pub use event::{Event, EventDraft, PastEvent, RecurrencePattern, RecurrenceSpec, RecurrenceUnit};
pub use scheduler::{SaveOutcome, ScheduleConflict, SchedulerConfig, SchedulingService};
pub use settings::{ReminderPreferences, Settings};
pub use storage::{Config, DeleteOutcome, EventDb, ExportBundle};
