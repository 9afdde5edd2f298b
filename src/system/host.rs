//! Watchface host on the PineTime hardware

use chrono::NaiveDateTime;
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use heapless::Vec;
use modern_watchface::{
    clock::HandAngles,
    host::{
        AppMessageResult, BatteryCharge, ClockHost, ConnectionIcon, EventSource, Layer, SendError,
        TextSlot,
    },
    ui::{ModernWatchface, Screen},
    Event,
};

use super::{companion, time::TimeManager};
use crate::peripherals::display::{self, Display};

/// Vibration requests, value is the pulse count
pub static NOTIFY: Signal<ThreadModeRawMutex, u8> = Signal::new();

pub struct PineTimeHost {
    time: TimeManager,
    display: Display<'static>,
    face: ModernWatchface,
    screen: Screen,
    /// Latest battery report
    battery: BatteryCharge,
    /// Latest link state
    connected: bool,
    subscriptions: [bool; 4],
    layers_created: bool,
    dirty: bool,
}

impl PineTimeHost {
    pub fn new(time: TimeManager, display: Display<'static>, battery: BatteryCharge) -> Self {
        Self {
            time,
            display,
            face: ModernWatchface::new(display::size()),
            screen: Screen::new(),
            battery,
            connected: false,
            subscriptions: [false; 4],
            layers_created: false,
            dirty: false,
        }
    }

    /// Record the battery and link state carried by `event` and tell whether
    /// the watchface is subscribed to it.
    pub fn accept(&mut self, event: &Event<'_>) -> bool {
        let source = match *event {
            Event::Tick(_) => EventSource::Tick,
            Event::Battery(charge) => {
                self.battery = charge;
                EventSource::Battery
            }
            Event::Bluetooth(connected) => {
                self.connected = connected;
                EventSource::Bluetooth
            }
            Event::InboxReceived(_)
            | Event::InboxDropped(_)
            | Event::OutboxSent
            | Event::OutboxFailed(_) => EventSource::AppMessage,
        };
        self.subscriptions[source_index(source)]
    }

    /// Repaint the panel if anything changed since the last frame.
    pub fn flush(&mut self) {
        if !(self.dirty && self.layers_created) {
            return;
        }
        if let Err(e) = self.display.draw(&self.face, &self.screen) {
            defmt::warn!("frame not drawn: {}", e);
        }
        self.dirty = false;
    }
}

impl ClockHost for PineTimeHost {
    fn now(&self) -> NaiveDateTime {
        self.time.get_time()
    }

    fn battery(&self) -> BatteryCharge {
        self.battery
    }

    fn bluetooth_connected(&self) -> bool {
        self.connected
    }

    fn create_layers(&mut self) {
        self.screen = Screen::new();
        self.layers_created = true;
        self.dirty = true;
    }

    fn destroy_layers(&mut self) {
        self.layers_created = false;
        self.dirty = false;
        if let Err(e) = self.display.clear() {
            defmt::warn!("display not cleared: {}", e);
        }
    }

    fn subscribe(&mut self, source: EventSource) {
        self.subscriptions[source_index(source)] = true;
    }

    fn unsubscribe(&mut self, source: EventSource) {
        self.subscriptions[source_index(source)] = false;
    }

    fn send_message(&mut self, payload: &[u8]) -> Result<(), SendError> {
        if !self.connected {
            return Err(SendError(AppMessageResult::NotConnected));
        }
        let message =
            Vec::from_slice(payload).map_err(|_| SendError(AppMessageResult::BufferOverflow))?;
        companion::OUTBOX
            .try_send(message)
            .map_err(|_| SendError(AppMessageResult::Busy))
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        if let Err(e) = self.screen.set_text(slot, text) {
            defmt::warn!("label {} not updated: {}", slot, e);
        }
    }

    fn set_connection_icon(&mut self, icon: ConnectionIcon) {
        self.screen.connection = icon;
    }

    fn set_charging_visible(&mut self, visible: bool) {
        self.screen.charging_visible = visible;
    }

    fn set_battery_level(&mut self, percent: u8) {
        self.screen.battery_percent = percent;
    }

    fn set_hands(&mut self, angles: HandAngles) {
        self.screen.hands = angles;
    }

    fn request_redraw(&mut self, _layer: Layer) {
        // The panel is always repainted as a whole
        self.dirty = true;
    }

    fn vibe_short_pulse(&mut self) {
        NOTIFY.signal(1);
    }
}

fn source_index(source: EventSource) -> usize {
    match source {
        EventSource::Tick => 0,
        EventSource::Battery => 1,
        EventSource::Bluetooth => 2,
        EventSource::AppMessage => 3,
    }
}
