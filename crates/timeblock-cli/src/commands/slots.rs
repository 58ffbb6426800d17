//! Free-slot search commands for CLI.

use clap::Subcommand;
use timeblock_core::{calculate_free_time_between_events, suggest_available_slots, Config};

use crate::common::{format_time, open_service, parse_time, CliResult};

#[derive(Subcommand)]
pub enum SlotsAction {
    /// Suggest free slots near a requested time
    Suggest {
        /// Desired start time
        #[arg(long)]
        near: String,
        /// Duration in minutes
        #[arg(long)]
        duration: i64,
        /// Search window in minutes (defaults to config)
        #[arg(long)]
        window: Option<i64>,
        /// Maximum suggestions (defaults to config)
        #[arg(long)]
        max: Option<usize>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// First free slot at or after a time
    Next {
        /// Search from this time
        #[arg(long)]
        after: String,
        /// Duration in minutes
        #[arg(long)]
        duration: i64,
    },
    /// Largest free slot within a range
    Largest {
        /// Range start
        #[arg(long)]
        from: String,
        /// Range end
        #[arg(long)]
        to: String,
    },
    /// Free minutes between two events, in order
    Between {
        /// Earlier event ID
        first: String,
        /// Later event ID
        second: String,
    },
}

pub fn run(action: SlotsAction) -> CliResult {
    match action {
        SlotsAction::Suggest {
            near,
            duration,
            window,
            max,
            json,
        } => {
            let config = Config::load();
            let svc = open_service()?;
            let slots = suggest_available_slots(
                parse_time(&near)?,
                duration,
                &svc.store().all_events()?,
                window.unwrap_or(config.scheduler.search_window_minutes),
                max.unwrap_or(config.scheduler.max_suggestions),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else if slots.is_empty() {
                println!("No free slots in the search window.");
            } else {
                for slot in slots {
                    println!("{} - {}", format_time(slot.start), format_time(slot.end));
                }
            }
        }

        SlotsAction::Next { after, duration } => {
            let svc = open_service()?;
            let slot = svc.find_slot(parse_time(&after)?, duration)?;
            println!("{} - {}", format_time(slot.start), format_time(slot.end));
        }

        SlotsAction::Largest { from, to } => {
            let svc = open_service()?;
            match svc.largest_free_slot(parse_time(&from)?, parse_time(&to)?)? {
                Some(slot) => println!(
                    "{} - {} ({} min)",
                    format_time(slot.start),
                    format_time(slot.end),
                    slot.duration_minutes()
                ),
                None => println!("No free slot in that range."),
            }
        }

        SlotsAction::Between { first, second } => {
            let svc = open_service()?;
            let earlier = svc
                .store()
                .get_event(&first)?
                .ok_or_else(|| format!("event not found: {first}"))?;
            let later = svc
                .store()
                .get_event(&second)?
                .ok_or_else(|| format!("event not found: {second}"))?;
            println!(
                "{} min",
                calculate_free_time_between_events(&earlier, &later)
            );
        }
    }
    Ok(())
}
