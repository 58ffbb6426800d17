use clap::{Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "timeblock", version, about = "Timeblock calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Free-slot search
    Slots {
        #[command(subcommand)]
        action: commands::slots::SlotsAction,
    },
    /// Data export, import and reset
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Calendar settings and reminder preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Event { action } => commands::event::run(action),
        Commands::Slots { action } => commands::slots::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Settings { action } => commands::settings::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
