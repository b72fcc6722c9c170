use clap::Subcommand;
use fastrack_core::{Config, ConfigError};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting (e.g. "tracker.default_plan")
    Get { key: String },
    /// Validate and store one setting
    Set {
        key: String,
        /// Parsed as the setting's current type
        value: String,
    },
    /// Print config.toml as stored on disk
    List {
        /// Print the parsed settings as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print where config.toml lives
    Path,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    let path = Config::path()?;
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_from(&path)?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(&path)?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            tracing::info!(%key, value = %stored, path = %path.display(), "config updated");
            println!("{key} = {stored}");
        }
        ConfigAction::List { json } => {
            let config = Config::load_from(&path)?;
            if json {
                print_json(&config)?;
            } else {
                print!("{}", std::fs::read_to_string(&path)?);
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Reset => {
            Config::default().save_to(&path)?;
            println!("reset {}", path.display());
        }
    }
    Ok(())
}
