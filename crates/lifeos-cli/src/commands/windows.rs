//! Posting-window query and on-demand notification.

use lifeos_core::alerts::alert_message;
use lifeos_core::notify::{Notifier, TelegramNotifier};
use lifeos_core::storage::Config;
use lifeos_core::windows::{upcoming, RolloverBoundary, WindowOccurrence};
use lifeos_core::Clock;
use serde::Serialize;

#[derive(Serialize)]
struct WindowsReport {
    timezone: String,
    windows: Vec<WindowOccurrence>,
}

pub fn run(notify: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = Clock::new(&config.timezone)?;
    let windows = config.posting_windows()?;

    // The query keeps an in-progress window visible until its end.
    let occurrences = upcoming(clock.now(), &windows, RolloverBoundary::End);

    if notify {
        let Some(next) = occurrences.first() else {
            return Err("no posting windows configured".into());
        };
        let Some(notifier) = TelegramNotifier::from_config(&config.telegram) else {
            return Err("telegram is not configured".into());
        };
        let sent = tokio::runtime::Runtime::new()?.block_on(notifier.send(&alert_message(next)));
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "sent": sent, "window": next }))?
        );
        return Ok(());
    }

    let report = WindowsReport {
        timezone: config.timezone.clone(),
        windows: occurrences,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
