//! Event management commands for CLI.

use clap::Subcommand;
use timeblock_core::{EventDraft, RecurrenceSpec, RecurrenceUnit, SaveOutcome, ScheduleConflict};

use crate::common::{format_time, open_service, parse_time, CliResult};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a new event (refuses to double-book)
    Add {
        /// Event title
        title: String,
        /// Start time (RFC 3339 or "YYYY-MM-DD HH:MM", UTC)
        #[arg(long)]
        start: String,
        /// End time
        #[arg(long)]
        end: String,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Display color, e.g. "#3b82f6"
        #[arg(long)]
        color: Option<String>,
        /// Reminder offset in minutes before start
        #[arg(long)]
        reminder: Option<i64>,
        /// Recurrence unit: days, weeks, months or years
        #[arg(long)]
        recur: Option<String>,
        /// Repeat every N units
        #[arg(long, default_value = "1")]
        recur_interval: u32,
        /// Pinned weekday for recurrence (0 = Sunday .. 6 = Saturday)
        #[arg(long)]
        recur_day: Option<u8>,
    },
    /// List events, optionally restricted to a range
    List {
        /// Range start
        #[arg(long)]
        from: Option<String>,
        /// Range end
        #[arg(long)]
        to: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Get event details
    Get {
        /// Event ID
        id: String,
    },
    /// Update an existing event
    Update {
        /// Event ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New start time
        #[arg(long)]
        start: Option<String>,
        /// New end time
        #[arg(long)]
        end: Option<String>,
        /// New location
        #[arg(long)]
        location: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
        /// New reminder offset in minutes
        #[arg(long)]
        reminder: Option<i64>,
        /// Drop the recurrence rule
        #[arg(long)]
        no_recur: bool,
    },
    /// Delete an event (elapsed events are archived first)
    Delete {
        /// Event ID
        id: String,
    },
    /// List archived past events
    Past {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_unit(value: &str) -> Result<RecurrenceUnit, String> {
    match value {
        "days" => Ok(RecurrenceUnit::Days),
        "weeks" => Ok(RecurrenceUnit::Weeks),
        "months" => Ok(RecurrenceUnit::Months),
        "years" => Ok(RecurrenceUnit::Years),
        other => Err(format!(
            "unknown recurrence unit '{other}' (days, weeks, months, years)"
        )),
    }
}

fn report_conflict(conflict: &ScheduleConflict) {
    eprintln!("Scheduling conflict with:");
    for event in &conflict.conflicts {
        eprintln!(
            "  {} [{} - {}]",
            event.title,
            format_time(event.start_time),
            format_time(event.end_time)
        );
    }
    if !conflict.suggestions.is_empty() {
        eprintln!("Free slots nearby:");
        for slot in &conflict.suggestions {
            eprintln!("  {} - {}", format_time(slot.start), format_time(slot.end));
        }
    }
}

pub fn run(action: EventAction) -> CliResult {
    match action {
        EventAction::Add {
            title,
            start,
            end,
            location,
            description,
            color,
            reminder,
            recur,
            recur_interval,
            recur_day,
        } => {
            let recurring = match recur {
                Some(unit) => Some(RecurrenceSpec {
                    unit: parse_unit(&unit)?,
                    interval: recur_interval,
                    day_of_week: recur_day,
                }),
                None => None,
            };
            let draft = EventDraft {
                id: None,
                title,
                start_time: parse_time(&start)?.to_rfc3339(),
                end_time: parse_time(&end)?.to_rfc3339(),
                location,
                description,
                color,
                reminder_minutes: reminder,
                recurring,
            };

            let svc = open_service()?;
            match svc.save_event(&draft)? {
                SaveOutcome::Saved(event) => {
                    println!("Event created: {} ({})", event.title, event.id);
                }
                SaveOutcome::Conflict(conflict) => {
                    report_conflict(&conflict);
                    return Err("scheduling conflict detected".into());
                }
            }
        }

        EventAction::List { from, to, json } => {
            let svc = open_service()?;
            let events = match (from, to) {
                (Some(from), Some(to)) => {
                    svc.events_in_range(parse_time(&from)?, parse_time(&to)?)?
                }
                (None, None) => svc.store().all_events()?,
                _ => return Err("--from and --to must be given together".into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                for event in events {
                    println!(
                        "{} - {}  {}  ({})",
                        format_time(event.start_time),
                        format_time(event.end_time),
                        event.title,
                        event.id
                    );
                }
            }
        }

        EventAction::Get { id } => {
            let svc = open_service()?;
            let event = svc
                .store()
                .get_event(&id)?
                .ok_or_else(|| format!("event not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        EventAction::Update {
            id,
            title,
            start,
            end,
            location,
            description,
            color,
            reminder,
            no_recur,
        } => {
            let svc = open_service()?;
            let existing = svc
                .store()
                .get_event(&id)?
                .ok_or_else(|| format!("event not found: {id}"))?;

            let mut draft = EventDraft::from_event(&existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(start) = start {
                draft.start_time = parse_time(&start)?.to_rfc3339();
            }
            if let Some(end) = end {
                draft.end_time = parse_time(&end)?.to_rfc3339();
            }
            if location.is_some() {
                draft.location = location;
            }
            if description.is_some() {
                draft.description = description;
            }
            if color.is_some() {
                draft.color = color;
            }
            if reminder.is_some() {
                draft.reminder_minutes = reminder;
            }
            if no_recur {
                draft.recurring = None;
            }

            match svc.save_event(&draft)? {
                SaveOutcome::Saved(event) => {
                    println!("Event updated: {} ({})", event.title, event.id);
                }
                SaveOutcome::Conflict(conflict) => {
                    report_conflict(&conflict);
                    return Err("scheduling conflict detected".into());
                }
            }
        }

        EventAction::Delete { id } => {
            let svc = open_service()?;
            let outcome = svc.delete_event(&id)?;
            if let Some(err) = outcome.archival_error {
                eprintln!("warning: archival failed: {err}");
            }
            if outcome.archived {
                println!("Event deleted and archived: {}", outcome.event.title);
            } else {
                println!("Event deleted: {}", outcome.event.title);
            }
        }

        EventAction::Past { json } => {
            let svc = open_service()?;
            let past = svc.store().past_events()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&past)?);
            } else {
                for entry in past {
                    println!(
                        "{} - {}  {}  (archived {})",
                        format_time(entry.event.start_time),
                        format_time(entry.event.end_time),
                        entry.event.title,
                        format_time(entry.archived_at)
                    );
                }
            }
        }
    }
    Ok(())
}
