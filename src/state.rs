//! Render state of the watchface
//!
//! Aggregates the latest clock, battery and connection values together with
//! the display strings derived from them. Strings are only recomputed when
//! their source changes: the remote clock on a minute boundary, the date
//! labels at exactly midnight, battery labels on every battery report.

use chrono::NaiveDateTime;

use crate::{
    clock::{self, ClockState, ClockText, DateText, HandAngles, PercentText, WeekdayText},
    config::Config,
    error::Error,
    host::{BatteryCharge, ConnectionIcon},
};

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryState {
    /// Watch battery in percent
    pub local_percent: u8,
    /// Watch charger attached
    pub charging: bool,
    /// Phone battery in percent, unknown until the phone reports it
    pub remote_percent: Option<u8>,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BluetoothState {
    pub connected: bool,
}

/// Text shown in the label layers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayStrings {
    pub day_date: DateText,
    pub weekday: WeekdayText,
    pub remote_clock: ClockText,
    pub phone_battery: PercentText,
    pub watch_battery: PercentText,
}

/// Labels recomputed by a tick
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickUpdate {
    pub remote_clock: bool,
    pub date: bool,
}

/// Result of a connection report
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionUpdate {
    pub icon: ConnectionIcon,
    /// Vibrate once
    pub pulse: bool,
}

pub struct RenderState {
    config: Config,
    clock: ClockState,
    hands: HandAngles,
    battery: BatteryState,
    bluetooth: BluetoothState,
    strings: DisplayStrings,
}

impl RenderState {
    /// Seed the state at startup.
    ///
    /// All labels are computed once here regardless of the time of day.
    pub fn new(
        now: &NaiveDateTime,
        battery: BatteryCharge,
        connected: bool,
        config: Config,
    ) -> Result<Self, Error> {
        let clock = ClockState::from_time(now);
        let mut state = Self {
            config,
            clock,
            hands: HandAngles::from_clock(&clock),
            battery: BatteryState {
                local_percent: config.initial_battery_percent,
                charging: false,
                remote_percent: None,
            },
            bluetooth: BluetoothState { connected },
            strings: DisplayStrings::default(),
        };

        state.on_battery_changed(battery)?;
        state.update_remote_clock(now)?;
        state.update_date(now)?;

        Ok(state)
    }

    /// Advance to the time of a new tick.
    pub fn on_second_tick(&mut self, now: &NaiveDateTime) -> Result<TickUpdate, Error> {
        self.clock = ClockState::from_time(now);
        self.hands = HandAngles::from_clock(&self.clock);

        let mut update = TickUpdate::default();
        if self.clock.is_minute_boundary() {
            self.update_remote_clock(now)?;
            update.remote_clock = true;
        }
        if self.clock.is_midnight() {
            self.update_date(now)?;
            update.date = true;
        }

        Ok(update)
    }

    pub fn on_battery_changed(&mut self, charge: BatteryCharge) -> Result<(), Error> {
        self.battery.local_percent = charge.percent;
        self.battery.charging = charge.charging;
        self.strings.watch_battery = clock::format_percent(charge.percent)?;
        Ok(())
    }

    /// Record a connection report.
    ///
    /// Every report of a lost connection asks for a pulse, repeated ones
    /// included.
    pub fn on_bluetooth_changed(&mut self, connected: bool) -> ConnectionUpdate {
        self.bluetooth.connected = connected;
        ConnectionUpdate {
            icon: ConnectionIcon::for_state(connected),
            pulse: !connected,
        }
    }

    pub fn set_phone_battery(&mut self, percent: u8) -> Result<(), Error> {
        self.strings.phone_battery = clock::format_percent(percent)?;
        self.battery.remote_percent = Some(percent);
        Ok(())
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn hands(&self) -> HandAngles {
        self.hands
    }

    pub fn battery(&self) -> BatteryState {
        self.battery
    }

    pub fn bluetooth(&self) -> BluetoothState {
        self.bluetooth
    }

    pub fn strings(&self) -> &DisplayStrings {
        &self.strings
    }

    fn update_remote_clock(&mut self, now: &NaiveDateTime) -> Result<(), Error> {
        let remote = clock::remote_time(now, &self.config);
        self.strings.remote_clock = clock::format_clock(&remote)?;
        Ok(())
    }

    fn update_date(&mut self, now: &NaiveDateTime) -> Result<(), Error> {
        self.strings.day_date = clock::format_day_date(now)?;
        self.strings.weekday = clock::format_weekday(now)?;
        Ok(())
    }
}
