//! Posting-window alert daemon.
//!
//! A long-lived polling loop: every tick it derives the upcoming windows
//! from the wall clock and fires each window's pre-alert at most once per
//! day. Dedup state lives in memory for the hot path and in SQLite so a
//! restart mid-day cannot re-fire. A failed send is not recorded, so the
//! next tick retries until the firing band closes; after that the
//! occurrence is missed for the day (fail-open).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;

use crate::clock::{day_key, Clock};
use crate::notify::Notifier;
use crate::storage::Database;
use crate::windows::{upcoming, PostingWindow, RolloverBoundary, WindowOccurrence};

/// Default seconds between ticks. Coupled to the one-minute firing band:
/// a coarser interval would step over the band entirely.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Width of the firing band starting at `alert_at`.
const FIRING_BAND_MINUTES: i64 = 1;

pub struct AlertScheduler {
    clock: Clock,
    windows: Vec<PostingWindow>,
    notifier: Option<Arc<dyn Notifier>>,
    db: Database,
    poll_interval: StdDuration,
    fired: HashSet<String>,
    current_day: Option<NaiveDate>,
}

impl AlertScheduler {
    pub fn new(
        clock: Clock,
        windows: Vec<PostingWindow>,
        notifier: Option<Arc<dyn Notifier>>,
        db: Database,
    ) -> Self {
        Self {
            clock,
            windows,
            notifier,
            db,
            poll_interval: StdDuration::from_secs(POLL_INTERVAL_SECS),
            fired: HashSet::new(),
            current_day: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: StdDuration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run until the shutdown channel flips to true (or its sender drops).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            windows = self.windows.len(),
            interval_secs = self.poll_interval.as_secs(),
            "alert scheduler started"
        );
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = self.clock.now();
                    self.check(now).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("alert scheduler stopping");
                        break;
                    }
                }
            }
        }
    }

    /// One tick against an explicit instant. Returns the number of alerts
    /// sent, so tests can drive the loop without sleeping.
    pub async fn check(&mut self, now: DateTime<Tz>) -> usize {
        let today = now.date_naive();
        if self.current_day != Some(today) {
            // Day rollover resets eligibility; reload durable keys so a
            // restart mid-day stays deduplicated.
            self.fired.clear();
            match self.db.fired_alert_keys_on(&day_key(today)) {
                Ok(keys) => self.fired.extend(keys),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to load fired alert keys")
                }
            }
            self.current_day = Some(today);
        }

        let mut sent = 0;
        for occurrence in upcoming(now, &self.windows, RolloverBoundary::Start) {
            let key = dedup_key(&occurrence);
            if self.fired.contains(&key) {
                continue;
            }
            if !in_firing_band(now, &occurrence) {
                continue;
            }
            let Some(notifier) = &self.notifier else {
                tracing::warn!(window = %occurrence.label, "notifier not configured, alert skipped");
                continue;
            };

            if notifier.send(&alert_message(&occurrence)).await {
                if let Err(err) = self.db.record_alert_fired(
                    &key,
                    &day_key(occurrence.alert_at.date_naive()),
                    now.with_timezone(&Utc),
                ) {
                    // Keep running on the in-memory set alone.
                    tracing::warn!(error = %err, "failed to persist fired alert key");
                }
                self.fired.insert(key);
                sent += 1;
                tracing::info!(window = %occurrence.label, "posting-window alert sent");
            } else {
                // Not recorded: the next tick retries while the band is open.
                tracing::warn!(window = %occurrence.label, "alert send failed");
            }
        }
        sent
    }
}

fn dedup_key(occurrence: &WindowOccurrence) -> String {
    format!(
        "{}:{}",
        occurrence.label,
        day_key(occurrence.alert_at.date_naive())
    )
}

fn in_firing_band(now: DateTime<Tz>, occurrence: &WindowOccurrence) -> bool {
    occurrence.alert_at <= now
        && now < occurrence.alert_at + Duration::minutes(FIRING_BAND_MINUTES)
}

/// Alert text for one occurrence.
pub fn alert_message(occurrence: &WindowOccurrence) -> String {
    format!(
        "Next window: {} ({} - {})",
        occurrence.label,
        occurrence.start.to_rfc3339(),
        occurrence.end.to_rfc3339()
    )
}
