//! Settings and reminder-preference commands for CLI.

use clap::Subcommand;

use crate::common::{open_service, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show calendar settings
    Show {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Update calendar settings
    Set {
        /// Initial view: month, week or day
        #[arg(long)]
        default_view: Option<String>,
        /// First day of the week (0 = Sunday .. 6 = Saturday)
        #[arg(long)]
        first_day_of_week: Option<u8>,
        /// Visible day start hour
        #[arg(long)]
        day_start_hour: Option<u8>,
        /// Visible day end hour
        #[arg(long)]
        day_end_hour: Option<u8>,
        /// Date format string
        #[arg(long)]
        date_format: Option<String>,
        /// Time format string
        #[arg(long)]
        time_format: Option<String>,
    },
    /// Show reminder preferences
    Reminders {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Update reminder preferences
    SetReminders {
        /// Default reminder offset in minutes
        #[arg(long)]
        default_reminder: Option<u32>,
        /// Notification sound name
        #[arg(long)]
        sound: Option<String>,
        /// Enable or disable desktop notifications
        #[arg(long)]
        desktop: Option<bool>,
        /// Enable or disable email notifications
        #[arg(long)]
        email: Option<bool>,
    },
}

pub fn run(action: SettingsAction) -> CliResult {
    match action {
        SettingsAction::Show { json } => {
            let svc = open_service()?;
            let settings = svc.store().settings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("default view:      {}", settings.default_view);
                println!("first day of week: {}", settings.first_day_of_week);
                println!("day hours:         {}-{}", settings.day_start_hour, settings.day_end_hour);
                println!("date format:       {}", settings.date_format);
                println!("time format:       {}", settings.time_format);
            }
        }

        SettingsAction::Set {
            default_view,
            first_day_of_week,
            day_start_hour,
            day_end_hour,
            date_format,
            time_format,
        } => {
            let svc = open_service()?;
            let mut settings = svc.store().settings()?;
            if let Some(v) = default_view {
                settings.default_view = v;
            }
            if let Some(v) = first_day_of_week {
                settings.first_day_of_week = v;
            }
            if let Some(v) = day_start_hour {
                settings.day_start_hour = v;
            }
            if let Some(v) = day_end_hour {
                settings.day_end_hour = v;
            }
            if let Some(v) = date_format {
                settings.date_format = v;
            }
            if let Some(v) = time_format {
                settings.time_format = v;
            }
            svc.store().save_settings(&settings)?;
            println!("Settings updated.");
        }

        SettingsAction::Reminders { json } => {
            let svc = open_service()?;
            let prefs = svc.store().reminder_preferences()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            } else {
                println!("default reminder:      {} min", prefs.default_reminder_minutes);
                println!("notification sound:    {}", prefs.notification_sound);
                println!("desktop notifications: {}", prefs.desktop_notifications);
                println!("email notifications:   {}", prefs.email_notifications);
                let times: Vec<String> = prefs.reminder_times.iter().map(u32::to_string).collect();
                println!("reminder times:        {} min", times.join(", "));
            }
        }

        SettingsAction::SetReminders {
            default_reminder,
            sound,
            desktop,
            email,
        } => {
            let svc = open_service()?;
            let mut prefs = svc.store().reminder_preferences()?;
            if let Some(v) = default_reminder {
                prefs.default_reminder_minutes = v;
            }
            if let Some(v) = sound {
                prefs.notification_sound = v;
            }
            if let Some(v) = desktop {
                prefs.desktop_notifications = v;
            }
            if let Some(v) = email {
                prefs.email_notifications = v;
            }
            svc.store().save_reminder_preferences(&prefs)?;
            println!("Reminder preferences updated.");
        }
    }
    Ok(())
}
