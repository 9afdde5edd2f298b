//! Capabilities the watchface needs from the platform it runs on
//!
//! Everything outside the watchface core (windows and layers, timers, the
//! battery and radio drivers, the message transport) sits behind
//! [`ClockHost`]. The PineTime firmware implements it on real hardware and the
//! tests implement it with a recorder.

use core::fmt;

use chrono::NaiveDateTime;

use crate::clock::HandAngles;

/// Event streams the watchface subscribes to
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// One tick per second
    Tick,
    /// Battery charge or charging state changed
    Battery,
    /// Phone connection came up or went down
    Bluetooth,
    /// Inbox and outbox callbacks of the phone message channel
    AppMessage,
}

impl EventSource {
    pub const ALL: [EventSource; 4] = [
        EventSource::Tick,
        EventSource::Battery,
        EventSource::Bluetooth,
        EventSource::AppMessage,
    ];
}

/// Text layers of the watchface
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    /// Day of month and month, bottom right
    DayDate,
    /// Weekday name, top centre
    Weekday,
    /// Clock of the remote zone, bottom left
    RemoteClock,
    /// Battery percent reported by the phone
    PhoneBattery,
    /// Battery percent of the watch itself
    WatchBattery,
}

/// Layers that can be marked dirty
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Root layer, redraws everything
    Window,
    /// Battery gauge
    Battery,
}

/// Connection icon variants
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionIcon {
    #[default]
    Connected,
    Disconnected,
}

impl ConnectionIcon {
    pub fn for_state(connected: bool) -> Self {
        if connected {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

/// Battery charge state as reported by the battery driver
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryCharge {
    /// Charge in percent (0–100)
    pub percent: u8,
    /// Charger attached
    pub charging: bool,
}

/// Outcome codes of the phone message channel
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMessageResult {
    Ok,
    SendTimeout,
    SendRejected,
    NotConnected,
    AppNotRunning,
    InvalidArgs,
    Busy,
    BufferOverflow,
    OutOfMemory,
    Closed,
    InternalError,
}

impl fmt::Display for AppMessageResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::SendTimeout => "send timeout",
            Self::SendRejected => "send rejected",
            Self::NotConnected => "not connected",
            Self::AppNotRunning => "app not running",
            Self::InvalidArgs => "invalid arguments",
            Self::Busy => "busy",
            Self::BufferOverflow => "buffer overflow",
            Self::OutOfMemory => "out of memory",
            Self::Closed => "closed",
            Self::InternalError => "internal error",
        })
    }
}

/// A message could not be queued on the outbox.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError(pub AppMessageResult);

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outbox send failed: {}", self.0)
    }
}

/// Platform services used by the watchface.
///
/// Every method is non-blocking. Callbacks for a source stop as soon as
/// [`ClockHost::unsubscribe`] returns.
pub trait ClockHost {
    /// Current local wall clock time.
    fn now(&self) -> NaiveDateTime;

    /// Current battery state, read without subscribing.
    fn battery(&self) -> BatteryCharge;

    /// Current phone connection state, read without subscribing.
    fn bluetooth_connected(&self) -> bool;

    /// Create the window, layers, fonts and icons.
    fn create_layers(&mut self);

    /// Release everything created by [`ClockHost::create_layers`].
    fn destroy_layers(&mut self);

    fn subscribe(&mut self, source: EventSource);

    fn unsubscribe(&mut self, source: EventSource);

    /// Queue an encoded dictionary on the outbox.
    fn send_message(&mut self, payload: &[u8]) -> Result<(), SendError>;

    fn set_text(&mut self, slot: TextSlot, text: &str);

    fn set_connection_icon(&mut self, icon: ConnectionIcon);

    fn set_charging_visible(&mut self, visible: bool);

    /// Hand the drawing layer the values it needs to paint the gauge and hands.
    fn set_battery_level(&mut self, percent: u8);

    fn set_hands(&mut self, angles: HandAngles);

    fn request_redraw(&mut self, layer: Layer);

    /// One short vibration pulse.
    fn vibe_short_pulse(&mut self);
}
