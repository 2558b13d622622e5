//! Niche (category) management commands for CLI.

use clap::Subcommand;
use lifeos_core::model::Niche;
use lifeos_core::storage::Database;

#[derive(Subcommand)]
pub enum NicheAction {
    /// List niches
    List,
    /// Create a new niche
    Create {
        /// Niche name
        name: String,
        #[arg(long, default_value = "")]
        icon: String,
        #[arg(long, default_value = "")]
        color: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

pub fn run(action: NicheAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        NicheAction::List => {
            let niches = db.list_niches()?;
            println!("{}", serde_json::to_string_pretty(&niches)?);
        }
        NicheAction::Create {
            name,
            icon,
            color,
            description,
        } => {
            let mut niche = Niche::new(name);
            niche.icon = icon;
            niche.color = color;
            niche.description = description;
            db.create_niche(&niche)?;
            println!("Niche created: {}", niche.id);
            println!("{}", serde_json::to_string_pretty(&niche)?);
        }
    }
    Ok(())
}
