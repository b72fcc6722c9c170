use fastrack_core::{Config, DashboardSummary};

use super::{open_controller, print_json, CliResult};

pub fn run() -> CliResult {
    let config = Config::load()?;
    let controller = open_controller(&config)?;
    let summary = DashboardSummary::from_history(controller.history(), controller.consecutive_days());
    print_json(&summary)
}
