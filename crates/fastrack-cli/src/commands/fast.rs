use std::time::Duration;

use chrono::NaiveTime;
use clap::Subcommand;
use fastrack_core::{Config, Countdown, FastingPlan, TickDriver, TickOutcome};

use super::{open_controller, print_json, CliResult};

#[derive(Subcommand)]
pub enum FastAction {
    /// Start a fast
    Start {
        /// Plan id ("16-8") or ratio ("16:8"); defaults to tracker.default_plan
        #[arg(long)]
        plan: Option<String>,
        /// Start at this time today (HH:MM or HH:MM:SS) instead of now
        #[arg(long, value_parser = parse_clock_time)]
        at: Option<NaiveTime>,
    },
    /// End the current fast now
    End,
    /// Print the tracker state as JSON
    Status,
    /// Recompute the time left once; ends the fast if it is due
    Tick,
    /// Follow the current fast, ticking every tracker.tick_interval_ms
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn parse_clock_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("expected HH:MM or HH:MM:SS, got '{s}'"))
}

pub fn run(action: FastAction) -> CliResult {
    let config = Config::load()?;
    let mut controller = open_controller(&config)?;

    match action {
        FastAction::Start { plan, at } => {
            let key = plan.unwrap_or_else(|| config.tracker.default_plan.clone());
            let plan = FastingPlan::find(&key)?;
            let event = controller.start_fasting(&plan, at)?;
            print_json(&event)?;
        }
        FastAction::End => {
            let event = controller.end_fasting()?;
            print_json(&event)?;
        }
        FastAction::Status => {
            print_json(&controller.snapshot())?;
        }
        FastAction::Tick => match controller.tick()? {
            TickOutcome::Ended(event) => print_json(&event)?,
            _ => print_json(&controller.snapshot())?,
        },
        FastAction::Watch { ticks } => {
            let Some(remaining) = controller.remaining() else {
                return print_json(&controller.snapshot());
            };

            let interval_ms = config.tracker.tick_interval_ms;
            let mut ring = Countdown::new((remaining.total_secs as u64).saturating_mul(1000), interval_ms)?;
            ring.start();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(async {
                let (driver, mut rx) = TickDriver::spawn(Duration::from_millis(interval_ms))?;
                while let Some(seq) = rx.recv().await {
                    ring.tick();
                    match controller.tick()? {
                        TickOutcome::Remaining(remaining) => {
                            let line = serde_json::json!({
                                "tick": seq,
                                "remaining": remaining.to_string(),
                                "elapsed_pct": remaining.elapsed_pct,
                                "ring_pct": ring.percentage(),
                            });
                            println!("{line}");
                        }
                        TickOutcome::Ended(event) => {
                            println!("{}", serde_json::to_string(&event)?);
                            break;
                        }
                        TickOutcome::Idle => break,
                    }
                    if ticks.is_some_and(|limit| seq >= limit) {
                        break;
                    }
                }
                driver.stop();
                Ok::<_, Box<dyn std::error::Error>>(())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_clock_times() {
        assert_eq!(
            parse_clock_time("08:00"),
            Ok(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_clock_time("21:15:30"),
            Ok(NaiveTime::from_hms_opt(21, 15, 30).unwrap())
        );
        assert!(parse_clock_time("8am").is_err());
        assert!(parse_clock_time("25:00").is_err());
    }
}
