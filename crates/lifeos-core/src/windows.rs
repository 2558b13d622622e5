//! Posting-window arithmetic.
//!
//! Pure functions mapping a timestamped instant to the next occurrence of
//! each recurring daily window. No hidden state: the user-facing query and
//! the alert loop derive the same answer from the same `now`.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

/// Minutes before a window's start at which its alert fires.
pub const ALERT_LEAD_MINUTES: i64 = 15;

/// A recurring daily clock-time interval for posting activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingWindow {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Which edge of a window, once passed, pushes the occurrence to tomorrow.
///
/// The user-facing query keeps showing an in-progress window until its end;
/// the alert loop stops treating a window as upcoming the instant its start
/// passes, so a window can never re-fire mid-occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverBoundary {
    Start,
    End,
}

/// The next future occurrence of a window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowOccurrence {
    pub label: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub alert_at: DateTime<Tz>,
}

/// Compute the next occurrence of each window relative to `now`, sorted
/// ascending by start.
pub fn upcoming(
    now: DateTime<Tz>,
    windows: &[PostingWindow],
    boundary: RolloverBoundary,
) -> Vec<WindowOccurrence> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut occurrences = Vec::with_capacity(windows.len());

    for window in windows {
        let Some(occurrence) = occurrence_for(tz, today, now, window, boundary) else {
            continue;
        };
        occurrences.push(occurrence);
    }

    occurrences.sort_by(|a, b| a.start.cmp(&b.start));
    occurrences
}

fn occurrence_for(
    tz: Tz,
    today: NaiveDate,
    now: DateTime<Tz>,
    window: &PostingWindow,
    boundary: RolloverBoundary,
) -> Option<WindowOccurrence> {
    let mut start = resolve_local(tz, today, window.start)?;
    let mut end = resolve_local(tz, today, window.end)?;

    let passed = match boundary {
        RolloverBoundary::Start => now > start,
        RolloverBoundary::End => now > end,
    };
    if passed {
        // Wall-clock rollover: re-resolve on tomorrow's date rather than
        // adding 24h, so DST transitions keep the configured clock times.
        let tomorrow = today.checked_add_days(Days::new(1))?;
        start = resolve_local(tz, tomorrow, window.start)?;
        end = resolve_local(tz, tomorrow, window.end)?;
    }

    Some(WindowOccurrence {
        label: window.label.clone(),
        start,
        end,
        alert_at: start - Duration::minutes(ALERT_LEAD_MINUTES),
    })
}

/// Resolve a local wall-clock time on a date. Ambiguous times (DST
/// fall-back) take the earlier instant; nonexistent times (spring-forward
/// gap) yield None and the window is skipped for that day.
fn resolve_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}
