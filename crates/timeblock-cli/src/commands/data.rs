//! Data export/import commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use timeblock_core::ExportBundle;

use crate::common::{open_service, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export all calendar data as a JSON bundle
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import a previously exported bundle, replacing everything
    Import {
        /// Bundle file
        file: PathBuf,
    },
    /// Delete all calendar data
    Reset {
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CliResult {
    match action {
        DataAction::Export { out } => {
            let svc = open_service()?;
            let bundle = svc.export()?;
            let json = bundle.to_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported {} events to {}", bundle.events.len(), path.display());
                }
                None => println!("{json}"),
            }
        }

        DataAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let bundle = ExportBundle::from_json(&json)?;
            let svc = open_service()?;
            svc.import(&bundle)?;
            println!("Imported {} events from {}", bundle.events.len(), file.display());
        }

        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete all data without --yes".into());
            }
            let svc = open_service()?;
            svc.store().clear_all()?;
            println!("All calendar data deleted.");
        }
    }
    Ok(())
}
