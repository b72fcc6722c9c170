use clap::Subcommand;
use fastrack_core::{Config, FastingRecord};

use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recorded fasts, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recorded fast by id
    Delete {
        /// Record id
        id: String,
    },
}

fn format_line(record: &FastingRecord, config: &Config) -> String {
    let date_fmt = &config.display.date_format;
    let time_fmt = &config.display.time_format;
    let day = record
        .day()
        .map(|d| d.format(date_fmt).to_string())
        .unwrap_or_else(|| record.date.clone());
    format!(
        "{}  {} {} -> {}  {}  {}",
        record.id,
        day,
        record.start_time.format(time_fmt),
        record.end_time.format(time_fmt),
        if record.completed { "completed" } else { "missed" },
        record.plan_id,
    )
}

pub fn run(action: HistoryAction) -> CliResult {
    let config = Config::load()?;
    let mut controller = open_controller(&config)?;

    match action {
        HistoryAction::List { json } => {
            if json {
                print_json(&controller.history())?;
            } else if controller.history().is_empty() {
                println!("no fasts recorded");
            } else {
                for record in controller.history() {
                    println!("{}", format_line(record, &config));
                }
            }
        }
        HistoryAction::Delete { id } => {
            let event = controller.delete_record(&id)?;
            print_json(&event)?;
        }
    }
    Ok(())
}
