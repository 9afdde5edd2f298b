//! Analog watchface with a second time zone and phone battery display.
//!
//! The core is platform independent: [`app::Watchface`] reacts to ticks,
//! battery and connection reports and phone messages, and drives the display
//! through a [`host::ClockHost`]. [`ui::ModernWatchface`] paints the result on
//! any `embedded-graphics` target.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod host;
pub mod message;
pub mod state;
pub mod ui;

pub use app::{Event, Watchface};
pub use config::Config;
pub use error::Error;
pub use host::ClockHost;
