use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lifeos-cli", version, about = "Life OS CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Niche (category) management
    Niche {
        #[command(subcommand)]
        action: commands::niche::NicheAction,
    },
    /// Today's stats
    Stats,
    /// Upcoming posting windows
    Windows {
        /// Send a Telegram alert for the next window
        #[arg(long)]
        notify: bool,
    },
    /// Run the posting-window alert daemon
    Alertd,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Niche { action } => commands::niche::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Windows { notify } => commands::windows::run(notify),
        Commands::Alertd => commands::alertd::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
