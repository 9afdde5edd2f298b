//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    primitives::Rectangle,
};
use heapless::String;

use crate::{
    clock::HandAngles,
    error::Error,
    host::{ConnectionIcon, TextSlot},
};

mod modern_watchface;

pub use modern_watchface::ModernWatchface;

const LABEL_LEN: usize = 16;
const SLOTS: usize = 5;

pub trait WatchFace {
    /// Paint the whole screen.
    fn draw<D>(&self, screen: &Screen, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Content of every layer of the watchface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    labels: [String<LABEL_LEN>; SLOTS],
    pub connection: ConnectionIcon,
    pub charging_visible: bool,
    pub battery_percent: u8,
    pub hands: HandAngles,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            labels: Default::default(),
            connection: ConnectionIcon::Connected,
            charging_visible: false,
            battery_percent: 0,
            hands: HandAngles::default(),
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text of a label.
    ///
    /// On overflow the label keeps its previous text.
    pub fn set_text(&mut self, slot: TextSlot, text: &str) -> Result<(), Error> {
        let mut label = String::new();
        label.push_str(text).map_err(|_| Error::TextOverflow)?;
        self.labels[slot_index(slot)] = label;
        Ok(())
    }

    pub fn text(&self, slot: TextSlot) -> &str {
        &self.labels[slot_index(slot)]
    }
}

fn slot_index(slot: TextSlot) -> usize {
    match slot {
        TextSlot::DayDate => 0,
        TextSlot::Weekday => 1,
        TextSlot::RemoteClock => 2,
        TextSlot::PhoneBattery => 3,
        TextSlot::WatchBattery => 4,
    }
}

/// Positions of the layers for a given screen size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub bounds: Rectangle,
    pub day_date: Rectangle,
    pub weekday: Rectangle,
    pub remote_clock: Rectangle,
    pub phone_battery: Rectangle,
    pub watch_battery: Rectangle,
    pub battery_gauge: Rectangle,
    pub charging_icon: Rectangle,
    pub connection_icon: Rectangle,
}

impl Layout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.width as i32, size.height as i32);
        let label = |x: i32, y: i32, width: i32| {
            Rectangle::new(Point::new(x, y), Size::new(width.max(0) as u32, 18))
        };

        Self {
            bounds: Rectangle::new(Point::zero(), size),
            day_date: label(0, h - 20, w - 5),
            weekday: label(0, 3, w),
            remote_clock: label(5, h - 20, w - 5),
            phone_battery: label(5, h - 36, w - 5),
            watch_battery: label(w - 45, 17, 41),
            battery_gauge: Rectangle::new(Point::new(w - 24, 5), Size::new(20, 10)),
            charging_icon: Rectangle::new(Point::new(w - 36, 5), Size::new(10, 10)),
            connection_icon: Rectangle::new(Point::new(5, 5), Size::new(12, 15)),
        }
    }

    /// Pivot of the hands, rounded up on even sizes
    pub fn center(&self) -> Point {
        let size = self.bounds.size;
        self.bounds.top_left + Point::new(size.width as i32 / 2, size.height as i32 / 2)
    }

    /// Length of the second hand
    pub fn second_hand_length(&self) -> i32 {
        self.bounds.size.width as i32 / 2 - 2
    }
}
