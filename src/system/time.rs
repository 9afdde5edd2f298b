//! Time keeping module for PineTime

use chrono::{Duration, NaiveDateTime};
use embassy_time::Instant;

/// Wall clock time captured together with the system time
#[derive(Clone, Copy)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UNIX timestamp taken now
    pub fn from_timestamp(secs: i64) -> Self {
        match NaiveDateTime::from_timestamp_opt(secs, 0) {
            Some(time) => Self {
                time,
                instant: Instant::now(),
            },
            None => Self::default(),
        }
    }
}

/// Local time derived from a reference and the uptime counter
#[derive(Clone, Copy)]
pub struct TimeManager {
    reference: TimeReference,
    /// Offset to UTC in seconds
    timezone: i64,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference, timezone: i64) -> Self {
        Self {
            reference,
            timezone,
        }
    }

    /// Get current local time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        let offset = Duration::microseconds(elapsed.as_micros() as i64)
            + Duration::seconds(self.timezone);
        self.reference
            .time
            .checked_add_signed(offset)
            .unwrap_or(self.reference.time)
    }
}
