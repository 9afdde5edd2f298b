//! Time formatting for the watchface
//!
//! Maps the local wall clock to hand angles and to the day, weekday and
//! remote clock labels. Nothing in here can fail except a text buffer that is
//! too short for its contents, which the buffer sizes below rule out.

use core::fmt::Write;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};
use embedded_graphics::geometry::Point;
use heapless::String;

use crate::{config::Config, error::Error};

/// Angle of one full turn of a hand
pub const FULL_TURN: i32 = 0x1_0000;

/// Hour hand positions per hour
const HOUR_STEPS: u32 = 6;

/// "16 Oct"
pub type DateText = String<10>;
/// "Wednesday"
pub type WeekdayText = String<10>;
/// "08:32"
pub type ClockText = String<6>;
/// "100%"
pub type PercentText = String<5>;

/// Local time of day as seen by the last tick
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockState {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockState {
    pub fn from_time(time: &NaiveDateTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second() as u8,
        }
    }

    /// The remote clock label only changes on a minute boundary.
    pub fn is_minute_boundary(&self) -> bool {
        self.second == 0
    }

    /// The date labels only change at exactly 00:00:00.
    pub fn is_midnight(&self) -> bool {
        self.hour == 0 && self.minute == 0 && self.second == 0
    }
}

/// Orientation of the three hands, in units of [`FULL_TURN`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandAngles {
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl HandAngles {
    pub fn from_clock(clock: &ClockState) -> Self {
        Self {
            hour: hour_angle(clock.hour as u32, clock.minute as u32),
            minute: minute_angle(clock.minute as u32),
            second: second_angle(clock.second as u32),
        }
    }
}

/// Hour hand angle.
///
/// The hand moves in steps of ten minutes, six positions per hour.
pub fn hour_angle(hour: u32, minute: u32) -> i32 {
    let step = (hour % 12) * HOUR_STEPS + minute / 10;
    FULL_TURN * step as i32 / (12 * HOUR_STEPS) as i32
}

pub fn minute_angle(minute: u32) -> i32 {
    FULL_TURN * minute as i32 / 60
}

pub fn second_angle(second: u32) -> i32 {
    FULL_TURN * second as i32 / 60
}

/// Rotate a point clockwise about the origin.
///
/// Screen coordinates grow downwards, so an angle of zero points up when the
/// point is `(0, -r)`. Results are truncated towards zero.
pub fn rotate(point: Point, angle: i32) -> Point {
    let radians = angle as f32 * 2.0 * core::f32::consts::PI / FULL_TURN as f32;
    let (sin, cos) = (libm::sinf(radians), libm::cosf(radians));
    let (x, y) = (point.x as f32, point.y as f32);

    Point::new((x * cos - y * sin) as i32, (x * sin + y * cos) as i32)
}

/// End point of the second hand for a hand of `length` pixels.
pub fn second_hand_tip(center: Point, length: i32, angle: i32) -> Point {
    center + rotate(Point::new(0, -length), angle)
}

/// Time shown on the remote clock.
///
/// The local time minus the configured offset plus the fixed skew hour.
pub fn remote_time(local: &NaiveDateTime, config: &Config) -> NaiveDateTime {
    local
        .checked_add_signed(Duration::seconds(config.remote_shift_secs()))
        .unwrap_or(*local)
}

/// Zero-padded 24-hour `HH:MM`.
pub fn format_clock(time: &NaiveDateTime) -> Result<ClockText, Error> {
    let mut text = ClockText::new();
    write!(text, "{:02}:{:02}", time.hour(), time.minute())?;
    Ok(text)
}

/// Day of month and abbreviated month, e.g. `05 Mar`.
pub fn format_day_date(time: &NaiveDateTime) -> Result<DateText, Error> {
    let month = match time.month0() {
        0 => "Jan",
        1 => "Feb",
        2 => "Mar",
        3 => "Apr",
        4 => "May",
        5 => "Jun",
        6 => "Jul",
        7 => "Aug",
        8 => "Sep",
        9 => "Oct",
        10 => "Nov",
        _ => "Dec",
    };

    let mut text = DateText::new();
    write!(text, "{:02} {}", time.day(), month)?;
    Ok(text)
}

/// Full weekday name.
pub fn format_weekday(time: &NaiveDateTime) -> Result<WeekdayText, Error> {
    let name = match time.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };

    let mut text = WeekdayText::new();
    text.push_str(name).map_err(|_| Error::TextOverflow)?;
    Ok(text)
}

/// Battery percentage label, e.g. `42%`.
pub fn format_percent(percent: u8) -> Result<PercentText, Error> {
    let mut text = PercentText::new();
    write!(text, "{}%", percent)?;
    Ok(text)
}
