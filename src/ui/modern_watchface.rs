//! Analog watchface with date, remote clock and battery labels

use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::{Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

use super::{Layout, Screen, WatchFace};
use crate::{
    clock,
    host::{ConnectionIcon, TextSlot},
};

const MINUTE_HAND_POINTS: [Point; 3] = [Point::new(-8, 20), Point::new(8, 20), Point::new(0, -100)];
const HOUR_HAND_POINTS: [Point; 3] = [Point::new(-6, 20), Point::new(6, 20), Point::new(0, -65)];

/// Bluetooth rune inside the 12x15 icon box
const BLUETOOTH_RUNE: [Point; 6] = [
    Point::new(2, 4),
    Point::new(9, 11),
    Point::new(5, 14),
    Point::new(5, 0),
    Point::new(9, 3),
    Point::new(2, 10),
];

/// Lightning bolt inside the 10x10 icon box
const LIGHTNING: [Point; 4] = [
    Point::new(6, 0),
    Point::new(2, 5),
    Point::new(7, 5),
    Point::new(3, 9),
];

/// Battery gauge fill, inset into the outline
const GAUGE_FILL_OFFSET: Point = Point::new(2, 2);
const GAUGE_FILL_WIDTH: u32 = 16;
const GAUGE_FILL_HEIGHT: u32 = 6;

/// Analog face in the style of the Pebble "modern" watchface
pub struct ModernWatchface {
    layout: Layout,
}

impl ModernWatchface {
    pub fn new(size: Size) -> Self {
        Self {
            layout: Layout::new(size),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn draw_label<D>(
        &self,
        target: &mut D,
        text: &str,
        frame: Rectangle,
        alignment: Alignment,
        character_style: MonoTextStyle<'_, Rgb565>,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if text.is_empty() {
            return Ok(());
        }

        let x = match alignment {
            Alignment::Left => frame.top_left.x,
            Alignment::Center => frame.top_left.x + frame.size.width as i32 / 2,
            Alignment::Right => frame.top_left.x + frame.size.width as i32 - 1,
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();

        Text::with_text_style(text, Point::new(x, frame.top_left.y), character_style, text_style)
            .draw(target)?;
        Ok(())
    }

    fn draw_hands<D>(&self, screen: &Screen, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let center = self.layout.center();
        let hand_style = PrimitiveStyleBuilder::new()
            .fill_color(Rgb565::WHITE)
            .stroke_color(Rgb565::BLACK)
            .stroke_width(1)
            .build();

        for (points, angle) in [
            (&HOUR_HAND_POINTS, screen.hands.hour),
            (&MINUTE_HAND_POINTS, screen.hands.minute),
        ] {
            let [a, b, c] = points.map(|p| center + clock::rotate(p, angle));
            Triangle::new(a, b, c).into_styled(hand_style).draw(target)?;
        }

        // second hand
        let tip = clock::second_hand_tip(
            center,
            self.layout.second_hand_length(),
            screen.hands.second,
        );
        Line::new(tip, center)
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(target)?;

        // dot in the middle
        Rectangle::new(center - Point::new(1, 1), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(target)?;

        Ok(())
    }

    fn draw_battery<D>(&self, screen: &Screen, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let gauge = self.layout.battery_gauge;
        gauge
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(target)?;

        let fill_width = screen.battery_percent.min(100) as u32 * GAUGE_FILL_WIDTH / 100;
        Rectangle::new(
            gauge.top_left + GAUGE_FILL_OFFSET,
            Size::new(fill_width, GAUGE_FILL_HEIGHT),
        )
        .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
        .draw(target)?;

        if screen.charging_visible {
            let origin = self.layout.charging_icon.top_left;
            let bolt = LIGHTNING.map(|p| origin + p);
            Polyline::new(&bolt)
                .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
                .draw(target)?;
        }

        Ok(())
    }

    fn draw_connection<D>(&self, screen: &Screen, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let frame = self.layout.connection_icon;
        let style = PrimitiveStyle::with_stroke(Rgb565::WHITE, 1);

        let rune = BLUETOOTH_RUNE.map(|p| frame.top_left + p);
        Polyline::new(&rune).into_styled(style).draw(target)?;

        if screen.connection == ConnectionIcon::Disconnected {
            if let Some(bottom_right) = frame.bottom_right() {
                Line::new(frame.top_left, bottom_right)
                    .into_styled(style)
                    .draw(target)?;
            }
        }

        Ok(())
    }
}

impl WatchFace for ModernWatchface {
    fn draw<D>(&self, screen: &Screen, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let label_style = MonoTextStyle::new(&PROFONT_12_POINT, Rgb565::WHITE);
        let boxed_label_style = MonoTextStyleBuilder::new()
            .font(&PROFONT_12_POINT)
            .text_color(Rgb565::WHITE)
            .background_color(Rgb565::BLACK)
            .build();
        let layout = &self.layout;

        target.clear(Rgb565::BLACK)?;

        // Layers in stacking order, bottom first
        self.draw_label(
            target,
            screen.text(TextSlot::DayDate),
            layout.day_date,
            Alignment::Right,
            boxed_label_style,
        )?;
        self.draw_label(
            target,
            screen.text(TextSlot::Weekday),
            layout.weekday,
            Alignment::Center,
            boxed_label_style,
        )?;
        self.draw_hands(screen, target)?;
        self.draw_battery(screen, target)?;
        self.draw_connection(screen, target)?;
        self.draw_label(
            target,
            screen.text(TextSlot::RemoteClock),
            layout.remote_clock,
            Alignment::Left,
            label_style,
        )?;
        self.draw_label(
            target,
            screen.text(TextSlot::PhoneBattery),
            layout.phone_battery,
            Alignment::Left,
            label_style,
        )?;
        self.draw_label(
            target,
            screen.text(TextSlot::WatchBattery),
            layout.watch_battery,
            Alignment::Right,
            label_style,
        )?;

        Ok(())
    }
}
