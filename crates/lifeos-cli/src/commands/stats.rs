//! Daily stats command.

use lifeos_core::completion::CompletionController;
use lifeos_core::storage::{Config, Database};
use lifeos_core::Clock;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let clock = Clock::new(&config.timezone)?;

    let stats = CompletionController::new(&db).stats(clock.now())?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
