use clap::Subcommand;
use fastrack_core::FastingPlan;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List the available plans
    List,
    /// Show one plan by id or ratio
    Show {
        /// Plan id ("16-8") or ratio ("16:8")
        plan: String,
    },
}

pub fn run(action: PlanAction) -> CliResult {
    match action {
        PlanAction::List => print_json(&FastingPlan::all()),
        PlanAction::Show { plan } => print_json(&FastingPlan::find(&plan)?),
    }
}
