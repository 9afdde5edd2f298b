use chrono::{NaiveDate, NaiveDateTime};
use modern_watchface::{
    clock::HandAngles,
    host::{
        AppMessageResult, BatteryCharge, ClockHost, ConnectionIcon, EventSource, Layer, SendError,
        TextSlot,
    },
    message::{self, dict::Dictionary},
    Config, Event, Watchface,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateLayers,
    DestroyLayers,
    Subscribe(EventSource),
    Unsubscribe(EventSource),
    Send(Vec<u8>),
    SetText(TextSlot, String),
    Icon(ConnectionIcon),
    Charging(bool),
    BatteryLevel(u8),
    Hands(HandAngles),
    Redraw(Layer),
    Vibe,
}

struct RecordingHost {
    now: NaiveDateTime,
    battery: BatteryCharge,
    connected: bool,
    reject_sends: bool,
    calls: Vec<Call>,
}

impl RecordingHost {
    fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            battery: BatteryCharge { percent: 55, charging: false },
            connected: true,
            reject_sends: false,
            calls: Vec::new(),
        }
    }

    fn sent(&self) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Send(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .collect()
    }

    fn texts(&self, slot: TextSlot) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::SetText(s, text) if *s == slot => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn vibes(&self) -> usize {
        self.calls.iter().filter(|call| **call == Call::Vibe).count()
    }
}

impl ClockHost for RecordingHost {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn battery(&self) -> BatteryCharge {
        self.battery
    }

    fn bluetooth_connected(&self) -> bool {
        self.connected
    }

    fn create_layers(&mut self) {
        self.calls.push(Call::CreateLayers);
    }

    fn destroy_layers(&mut self) {
        self.calls.push(Call::DestroyLayers);
    }

    fn subscribe(&mut self, source: EventSource) {
        self.calls.push(Call::Subscribe(source));
    }

    fn unsubscribe(&mut self, source: EventSource) {
        self.calls.push(Call::Unsubscribe(source));
    }

    fn send_message(&mut self, payload: &[u8]) -> Result<(), SendError> {
        if self.reject_sends {
            return Err(SendError(AppMessageResult::Busy));
        }
        self.calls.push(Call::Send(payload.to_vec()));
        Ok(())
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        self.calls.push(Call::SetText(slot, text.to_string()));
    }

    fn set_connection_icon(&mut self, icon: ConnectionIcon) {
        self.calls.push(Call::Icon(icon));
    }

    fn set_charging_visible(&mut self, visible: bool) {
        self.calls.push(Call::Charging(visible));
    }

    fn set_battery_level(&mut self, percent: u8) {
        self.calls.push(Call::BatteryLevel(percent));
    }

    fn set_hands(&mut self, angles: HandAngles) {
        self.calls.push(Call::Hands(angles));
    }

    fn request_redraw(&mut self, layer: Layer) {
        self.calls.push(Call::Redraw(layer));
    }

    fn vibe_short_pulse(&mut self) {
        self.calls.push(Call::Vibe);
    }
}

fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, d)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Start a watchface and forget the startup calls.
fn running(host: RecordingHost) -> Watchface<RecordingHost> {
    let mut watchface = Watchface::start(host, Config::DEFAULT).unwrap();
    watchface.host_mut().calls.clear();
    watchface
}

fn battery_value(bytes: &[u8]) -> Option<i64> {
    let dict = Dictionary::parse(bytes).unwrap();
    let tuples: Vec<_> = dict.iter().collect();
    assert_eq!(tuples.len(), 1);
    assert_eq!(tuples[0].key, message::KEY_BATTERY_PHONE);
    tuples[0].value.as_integer()
}

fn dictionary(key: u32, value: u8) -> Vec<u8> {
    vec![1, key as u8, 0, 0, 0, 2, 1, 0, value]
}

#[test]
fn startup_creates_layers_before_subscribing() {
    let watchface = Watchface::start(RecordingHost::new(at(3, 14, 32, 10)), Config::DEFAULT).unwrap();
    let calls = &watchface.host().calls;

    assert_eq!(calls.first(), Some(&Call::CreateLayers));
    let subscriptions: Vec<_> = calls
        .iter()
        .filter(|call| matches!(call, Call::Subscribe(_)))
        .cloned()
        .collect();
    assert_eq!(
        subscriptions,
        EventSource::ALL.iter().map(|s| Call::Subscribe(*s)).collect::<Vec<_>>()
    );
    assert!(matches!(calls.last(), Some(Call::Subscribe(_))));

    let host = watchface.host();
    assert_eq!(host.texts(TextSlot::RemoteClock), ["08:32"]);
    assert_eq!(host.texts(TextSlot::DayDate), ["03 Mar"]);
    assert_eq!(host.texts(TextSlot::Weekday), ["Sunday"]);
    assert_eq!(host.texts(TextSlot::WatchBattery), ["55%"]);
}

#[test]
fn startup_reports_battery_without_pulsing() {
    let mut host = RecordingHost::new(at(3, 9, 0, 0));
    host.connected = false;
    let watchface = Watchface::start(host, Config::DEFAULT).unwrap();
    let host = watchface.host();

    let sent = host.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(battery_value(sent[0]), Some(55));
    assert_eq!(host.vibes(), 0);
    assert!(host.calls.contains(&Call::Icon(ConnectionIcon::Disconnected)));
}

#[test]
fn shutdown_unsubscribes_then_destroys_once() {
    let watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    let host = watchface.stop();

    assert_eq!(host.calls.len(), 5);
    assert!(host.calls[..4]
        .iter()
        .all(|call| matches!(call, Call::Unsubscribe(_))));
    for source in EventSource::ALL {
        assert!(host.calls.contains(&Call::Unsubscribe(source)));
    }
    assert_eq!(host.calls[4], Call::DestroyLayers);
}

#[test]
fn every_tick_moves_hands_and_redraws() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    watchface.handle(Event::Tick(at(3, 9, 0, 1)));

    let calls = &watchface.host().calls;
    assert!(calls.iter().any(|call| matches!(call, Call::Hands(_))));
    assert_eq!(calls.last(), Some(&Call::Redraw(Layer::Window)));
    assert!(watchface.host().texts(TextSlot::RemoteClock).is_empty());
}

#[test]
fn remote_clock_updates_on_minute_boundary() {
    let mut watchface = running(RecordingHost::new(at(3, 14, 31, 58)));

    watchface.handle(Event::Tick(at(3, 14, 31, 59)));
    assert!(watchface.host().texts(TextSlot::RemoteClock).is_empty());

    watchface.handle(Event::Tick(at(3, 14, 32, 0)));
    assert_eq!(watchface.host().texts(TextSlot::RemoteClock), ["08:32"]);
}

#[test]
fn date_updates_exactly_once_at_midnight() {
    let mut watchface = running(RecordingHost::new(at(3, 23, 59, 58)));

    watchface.handle(Event::Tick(at(3, 23, 59, 59)));
    watchface.handle(Event::Tick(at(4, 0, 0, 0)));
    watchface.handle(Event::Tick(at(4, 0, 0, 1)));

    let host = watchface.host();
    assert_eq!(host.texts(TextSlot::DayDate), ["04 Mar"]);
    assert_eq!(host.texts(TextSlot::Weekday), ["Monday"]);
}

#[test]
fn phone_battery_message_updates_label() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    let bytes = dictionary(0, 42);
    watchface.handle(Event::InboxReceived(&bytes));

    assert_eq!(watchface.host().texts(TextSlot::PhoneBattery), ["42%"]);
    assert!(watchface.host().sent().is_empty());
    assert_eq!(watchface.state().battery().remote_percent, Some(42));
}

#[test]
fn battery_request_is_answered_once() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    let bytes = dictionary(1, 7);
    watchface.handle(Event::InboxReceived(&bytes));

    let sent = watchface.host().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(battery_value(sent[0]), Some(55));
}

#[test]
fn battery_change_broadcasts_new_level() {
    for charging in [false, true] {
        let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
        watchface.handle(Event::Battery(BatteryCharge { percent: 54, charging }));

        let host = watchface.host();
        let sent = host.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(battery_value(sent[0]), Some(54));
        assert!(host.calls.contains(&Call::Charging(charging)));
        assert!(host.calls.contains(&Call::BatteryLevel(54)));
        assert!(host.calls.contains(&Call::Redraw(Layer::Battery)));
        assert_eq!(host.texts(TextSlot::WatchBattery), ["54%"]);
    }
}

#[test]
fn request_after_battery_change_reports_stored_level() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    watchface.handle(Event::Battery(BatteryCharge { percent: 31, charging: false }));
    watchface.host_mut().calls.clear();

    let bytes = dictionary(1, 0);
    watchface.handle(Event::InboxReceived(&bytes));
    assert_eq!(battery_value(watchface.host().sent()[0]), Some(31));
}

#[test]
fn disconnect_pulses_and_reconnect_does_not() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));

    watchface.handle(Event::Bluetooth(false));
    assert_eq!(watchface.host().vibes(), 1);
    assert!(watchface
        .host()
        .calls
        .contains(&Call::Icon(ConnectionIcon::Disconnected)));

    watchface.handle(Event::Bluetooth(true));
    assert_eq!(watchface.host().vibes(), 1);
    assert!(watchface
        .host()
        .calls
        .contains(&Call::Icon(ConnectionIcon::Connected)));
}

#[test]
fn repeated_disconnect_pulses_again() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    watchface.handle(Event::Bluetooth(false));
    watchface.handle(Event::Bluetooth(false));
    assert_eq!(watchface.host().vibes(), 2);
}

#[test]
fn broken_message_changes_nothing() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    let bytes = dictionary(0, 42);
    watchface.handle(Event::InboxReceived(&bytes));
    watchface.host_mut().calls.clear();

    // Battery tuple announced twice but sent once
    watchface.handle(Event::InboxReceived(&[2, 0, 0, 0, 0, 2, 1, 0, 17]));
    // Battery tuple with a byte past the end
    watchface.handle(Event::InboxReceived(&[1, 0, 0, 0, 0, 2, 1, 0, 17, 0]));
    // A string tuple with no payload at all
    watchface.handle(Event::InboxReceived(&[1, 0, 0, 0, 0, 1, 0, 0]));
    watchface.handle(Event::InboxReceived(&[]));

    assert!(watchface.host().calls.is_empty());
    assert_eq!(watchface.state().strings().phone_battery.as_str(), "42%");
}

#[test]
fn bad_tuple_only_drops_itself() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));

    // Battery tuple followed by a string tuple that never terminates
    let bytes = [2, 0, 0, 0, 0, 2, 1, 0, 17, 3, 0, 0, 0, 1, 2, 0, b'h', b'i'];
    watchface.handle(Event::InboxReceived(&bytes));
    assert_eq!(watchface.host().texts(TextSlot::PhoneBattery), ["17%"]);

    // Battery request with a three byte integer
    watchface.host_mut().calls.clear();
    watchface.handle(Event::InboxReceived(&[1, 1, 0, 0, 0, 2, 3, 0, 1, 2, 3]));
    assert_eq!(watchface.host().sent().len(), 1);
}

#[test]
fn unknown_keys_are_ignored() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    let bytes = dictionary(9, 42);
    watchface.handle(Event::InboxReceived(&bytes));
    assert!(watchface.host().calls.is_empty());
}

#[test]
fn rejected_send_is_ignored() {
    let mut host = RecordingHost::new(at(3, 9, 0, 0));
    host.reject_sends = true;
    let mut watchface = running(host);

    watchface.handle(Event::Battery(BatteryCharge { percent: 54, charging: false }));
    let bytes = dictionary(1, 0);
    watchface.handle(Event::InboxReceived(&bytes));

    assert!(watchface.host().sent().is_empty());
    assert_eq!(watchface.state().battery().local_percent, 54);
}

#[test]
fn delivery_reports_have_no_side_effects() {
    let mut watchface = running(RecordingHost::new(at(3, 9, 0, 0)));
    watchface.handle(Event::OutboxSent);
    watchface.handle(Event::OutboxFailed(AppMessageResult::SendTimeout));
    watchface.handle(Event::InboxDropped(AppMessageResult::BufferOverflow));
    assert!(watchface.host().calls.is_empty());
}
