//! Channels to the phone link
//!
//! A radio transport task feeds [`INBOX`] and [`CONNECTION`] and drains
//! [`OUTBOX`]. The watchface task is the only consumer of the first two.

use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use heapless::Vec;
use modern_watchface::{host::AppMessageResult, message::Outbox, Event};

/// Largest inbound dictionary
pub const INBOX_LEN: usize = 64;

pub type Message = Vec<u8, INBOX_LEN>;

/// Result of the message channel, in arrival order
pub enum Delivery {
    Received(Message),
    Dropped(AppMessageResult),
    Sent,
    Failed(AppMessageResult),
}

impl Delivery {
    pub fn as_event(&self) -> Event<'_> {
        match self {
            Self::Received(bytes) => Event::InboxReceived(bytes),
            Self::Dropped(reason) => Event::InboxDropped(*reason),
            Self::Sent => Event::OutboxSent,
            Self::Failed(reason) => Event::OutboxFailed(*reason),
        }
    }
}

pub static INBOX: Channel<ThreadModeRawMutex, Delivery, 4> = Channel::new();
pub static OUTBOX: Channel<ThreadModeRawMutex, Outbox, 4> = Channel::new();
pub static CONNECTION: Signal<ThreadModeRawMutex, bool> = Signal::new();
