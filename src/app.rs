//! Watchface lifecycle
//!
//! Wires the render state and the message handler to a [`ClockHost`]. The host
//! delivers one [`Event`] at a time; nothing in here blocks or retries.

use chrono::NaiveDateTime;

use crate::{
    config::Config,
    error::Error,
    host::{
        AppMessageResult, BatteryCharge, ClockHost, ConnectionIcon, EventSource, Layer, TextSlot,
    },
    message::{self, Command},
    state::RenderState,
};

/// Callbacks the host delivers to a running watchface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// Second tick with the current local time
    Tick(NaiveDateTime),
    Battery(BatteryCharge),
    Bluetooth(bool),
    /// Encoded dictionary from the phone
    InboxReceived(&'a [u8]),
    InboxDropped(AppMessageResult),
    OutboxSent,
    OutboxFailed(AppMessageResult),
}

pub struct Watchface<H: ClockHost> {
    host: H,
    state: RenderState,
}

impl<H: ClockHost> Watchface<H> {
    /// Create the layers, show the initial state and subscribe to all event
    /// sources.
    pub fn start(mut host: H, config: Config) -> Result<Self, Error> {
        let now = host.now();
        let charge = host.battery();
        let connected = host.bluetooth_connected();
        let state = RenderState::new(&now, charge, connected, config)?;

        host.create_layers();
        let mut watchface = Self { host, state };
        watchface.show_all();
        watchface.send_battery_report();

        for source in EventSource::ALL {
            watchface.host.subscribe(source);
        }
        info!("watchface started");

        Ok(watchface)
    }

    /// Unsubscribe from every source, then release the layers.
    pub fn stop(mut self) -> H {
        for source in EventSource::ALL.iter().rev() {
            self.host.unsubscribe(*source);
        }
        self.host.destroy_layers();
        info!("watchface stopped");

        self.host
    }

    /// Dispatch one host callback.
    pub fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Tick(now) => self.on_tick(&now),
            Event::Battery(charge) => self.on_battery(charge),
            Event::Bluetooth(connected) => self.on_bluetooth(connected),
            Event::InboxReceived(bytes) => self.on_inbox_received(bytes),
            Event::InboxDropped(reason) => warn!("inbox message dropped: {}", reason),
            Event::OutboxSent => debug!("outbox message sent"),
            Event::OutboxFailed(reason) => warn!("outbox send failed: {}", reason),
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn on_tick(&mut self, now: &NaiveDateTime) {
        match self.state.on_second_tick(now) {
            Ok(update) => {
                if update.remote_clock {
                    self.show_remote_clock();
                }
                if update.date {
                    self.show_date();
                }
            }
            Err(e) => warn!("tick update failed: {}", e),
        }

        self.host.set_hands(self.state.hands());
        self.host.request_redraw(Layer::Window);
    }

    fn on_battery(&mut self, charge: BatteryCharge) {
        debug!("battery {} (charging: {})", charge.percent, charge.charging);
        if let Err(e) = self.state.on_battery_changed(charge) {
            warn!("battery update failed: {}", e);
        }

        self.show_battery();
        self.host.request_redraw(Layer::Battery);
        self.send_battery_report();
    }

    fn on_bluetooth(&mut self, connected: bool) {
        info!("phone connected: {}", connected);
        let update = self.state.on_bluetooth_changed(connected);

        self.host.set_connection_icon(update.icon);
        if update.pulse {
            self.host.vibe_short_pulse();
        }
        self.host.request_redraw(Layer::Window);
    }

    fn on_inbox_received(&mut self, bytes: &[u8]) {
        let commands = match message::decode(bytes) {
            Ok(commands) => commands,
            Err(e) => {
                warn!("dropping malformed message: {}", e);
                return;
            }
        };

        for command in commands {
            match command {
                Command::PhoneBattery(percent) => {
                    debug!("phone battery {}", percent);
                    match self.state.set_phone_battery(percent) {
                        Ok(()) => {
                            let text = &self.state.strings().phone_battery;
                            self.host.set_text(TextSlot::PhoneBattery, text);
                            self.host.request_redraw(Layer::Window);
                        }
                        Err(e) => warn!("phone battery update failed: {}", e),
                    }
                }
                Command::RequestWatchBattery => self.send_battery_report(),
            }
        }
    }

    /// Report the stored watch battery percent to the phone.
    fn send_battery_report(&mut self) {
        let percent = self.state.battery().local_percent;
        let report = match message::encode_battery_report(percent) {
            Ok(report) => report,
            Err(e) => {
                warn!("cannot encode battery report: {}", e);
                return;
            }
        };

        if let Err(e) = self.host.send_message(&report) {
            warn!("{}", e);
        }
    }

    fn show_all(&mut self) {
        self.show_date();
        self.show_remote_clock();
        let strings = self.state.strings();
        self.host.set_text(TextSlot::PhoneBattery, &strings.phone_battery);
        self.show_battery();
        let icon = ConnectionIcon::for_state(self.state.bluetooth().connected);
        self.host.set_connection_icon(icon);
        self.host.set_hands(self.state.hands());
        self.host.request_redraw(Layer::Window);
    }

    fn show_date(&mut self) {
        let strings = self.state.strings();
        self.host.set_text(TextSlot::DayDate, &strings.day_date);
        self.host.set_text(TextSlot::Weekday, &strings.weekday);
    }

    fn show_remote_clock(&mut self) {
        let strings = self.state.strings();
        self.host.set_text(TextSlot::RemoteClock, &strings.remote_clock);
    }

    fn show_battery(&mut self) {
        let battery = self.state.battery();
        self.host.set_charging_visible(battery.charging);
        self.host.set_battery_level(battery.local_percent);
        self.host
            .set_text(TextSlot::WatchBattery, &self.state.strings().watch_battery);
    }
}
