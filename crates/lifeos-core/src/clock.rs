//! Timezone-resolved clock and calendar-day keys.
//!
//! All log and streak bookkeeping is keyed by the calendar day in the
//! configured timezone, resolved once at write time. Core algorithms take
//! `now`/`today` parameters so the same arithmetic is reachable from tests
//! without touching the wall clock.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ConfigError;

/// Day-key format used on task logs and alert dedup keys.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Clock bound to a configured IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tz: Tz,
}

impl Clock {
    /// Build a clock from an IANA timezone name (e.g. `Europe/Kyiv`).
    ///
    /// # Errors
    /// Returns an error if the name is not in the timezone database.
    pub fn new(timezone: &str) -> Result<Self, ConfigError> {
        let tz = timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "timezone".to_string(),
                message: format!("unknown IANA timezone: {timezone}"),
            })?;
        Ok(Self { tz })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Current instant in the configured timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Today's calendar date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Today's day key (`YYYY-MM-DD`).
    pub fn day_key(&self) -> String {
        day_key(self.today())
    }
}

/// Format a calendar date as a day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a day key back into a calendar date.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}
