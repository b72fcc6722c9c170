use std::time::Duration;

use clap::Args;
use fastrack_core::{Countdown, TickDriver};

use super::CliResult;

#[derive(Args)]
pub struct CountdownArgs {
    /// Total duration in milliseconds
    #[arg(long)]
    duration_ms: u64,
    /// Decrement per tick, also the tick period
    #[arg(long, default_value = "1000")]
    interval_ms: u64,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

pub fn run(args: CountdownArgs) -> CliResult {
    let mut countdown = Countdown::new(args.duration_ms, args.interval_ms)?;
    if let Some(event) = countdown.start() {
        println!("{}", serde_json::to_string(&event)?);
    }
    if !countdown.is_running() {
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let (driver, mut rx) = TickDriver::spawn(Duration::from_millis(args.interval_ms))?;
        while let Some(seq) = rx.recv().await {
            let finished = countdown.tick();
            let line = serde_json::json!({
                "tick": seq,
                "time_left_ms": countdown.time_left_ms(),
                "percentage": countdown.percentage(),
            });
            println!("{line}");
            if let Some(event) = finished {
                println!("{}", serde_json::to_string(&event)?);
                break;
            }
            if args.ticks.is_some_and(|limit| seq >= limit) {
                break;
            }
        }
        driver.stop();
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}
