//! Long-running posting-window alert daemon.

use std::sync::Arc;
use std::time::Duration;

use lifeos_core::alerts::AlertScheduler;
use lifeos_core::notify::{Notifier, TelegramNotifier};
use lifeos_core::storage::{Config, Database};
use lifeos_core::Clock;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    if !config.alerts.enabled {
        return Err("alerts are disabled in config".into());
    }

    let clock = Clock::new(&config.timezone)?;
    let windows = config.posting_windows()?;
    let db = Database::open()?;

    let notifier =
        TelegramNotifier::from_config(&config.telegram).map(|n| Arc::new(n) as Arc<dyn Notifier>);
    if notifier.is_none() {
        tracing::warn!("telegram not configured; alerts will be skipped");
    }

    let scheduler = AlertScheduler::new(clock, windows, notifier, db)
        .with_poll_interval(Duration::from_secs(config.alerts.poll_interval_secs.max(1)));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(true);
            }
        });
        scheduler.run(shutdown_rx).await;
    });
    Ok(())
}
