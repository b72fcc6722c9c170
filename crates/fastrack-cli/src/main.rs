use clap::{CommandFactory, Parser, Subcommand};
use fastrack_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fastrack", version, about = "Fastrack intermittent-fasting tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fasting plans
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Fasting session control
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Fasting history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Summary of all recorded fasts
    Dashboard,
    /// Run a standalone countdown
    Countdown(commands::countdown::CountdownArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Log to stderr. `FASTRACK_LOG` takes an EnvFilter directive and overrides
/// the configured level.
fn init_logging() {
    let filter = EnvFilter::try_from_env("FASTRACK_LOG").unwrap_or_else(|_| {
        let level = Config::load_or_default().log.level;
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Fast { action } => commands::fast::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Dashboard => commands::dashboard::run(),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "fastrack", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
