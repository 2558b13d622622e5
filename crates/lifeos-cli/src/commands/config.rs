//! Configuration management commands for CLI.

use clap::Subcommand;
use lifeos_core::storage::Config;
use lifeos_core::Clock;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Print the config file path
    Path,
    /// Set the posting timezone (IANA name)
    SetTimezone {
        /// e.g. Europe/Kyiv
        timezone: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::SetTimezone { timezone } => {
            // Validate before persisting.
            Clock::new(&timezone)?;
            let mut config = Config::load()?;
            config.timezone = timezone;
            config.save()?;
            println!("Timezone set: {}", config.timezone);
        }
    }
    Ok(())
}
