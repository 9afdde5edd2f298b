//! Build-time watchface configuration

/// Watchface settings fixed at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Offset of the local clock from the remote zone, in hours
    pub utc_offset_hours: i32,
    /// Extra hours added to the remote clock after removing the offset
    pub remote_skew_hours: i32,
    /// Watch battery percent assumed before the first battery reading
    pub initial_battery_percent: u8,
}

impl Config {
    pub const DEFAULT: Self = Self {
        utc_offset_hours: 7,
        remote_skew_hours: 1,
        initial_battery_percent: 100,
    };

    /// Total shift from local time to the remote clock, in seconds.
    pub const fn remote_shift_secs(&self) -> i64 {
        (self.remote_skew_hours as i64 - self.utc_offset_hours as i64) * 3_600
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
