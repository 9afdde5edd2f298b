//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_14, P0_18, P0_22, P0_23, P0_25, P0_26, SPI2},
    spim::Spim,
};
use embassy_time::Delay;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};
use modern_watchface::ui::{Screen, WatchFace};

pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

type Lcd<'a> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI2>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

#[allow(unused)]
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Brightness {
    Off,
    Low,
    Medium,
    High,
}

/// Backlight control pins, active low
pub struct BacklightPins<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
}

impl<'a> BacklightPins<'a> {
    /// Configure backlight pins on boot
    pub fn init(low: Output<'a, P0_14>, mid: Output<'a, P0_22>, high: Output<'a, P0_23>) -> Self {
        Self { low, mid, high }
    }

    fn set(&mut self, level: Brightness) {
        self.low.set_high();
        self.mid.set_high();
        self.high.set_high();
        match level {
            Brightness::Off => {}
            Brightness::Low => self.low.set_low(),
            Brightness::Medium => self.mid.set_low(),
            Brightness::High => self.high.set_low(),
        }
    }
}

pub struct Display<'a> {
    lcd: Lcd<'a>,
    backlight: BacklightPins<'a>,
}

impl<'a> Display<'a> {
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'a, SPI2>,
        cs_pin: Output<'a, P0_25>,
        dc_pin: Output<'a, P0_18>,
        rst_pin: Output<'a, P0_26>,
        backlight: BacklightPins<'a>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd, backlight };
        display.set_brightness(Brightness::Off);
        display.clear()?;
        Ok(display)
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), Error> {
        self.lcd.clear(Rgb565::BLACK).map_err(|_| Error::Interface)
    }

    /// Paint a full frame of the watchface
    pub fn draw<F: WatchFace>(&mut self, face: &F, screen: &Screen) -> Result<(), Error> {
        face.draw(screen, &mut self.lcd).map_err(|_| Error::Interface)
    }

    /// Set the backlight brightness
    pub fn set_brightness(&mut self, level: Brightness) {
        self.backlight.set(level);
    }
}

pub fn size() -> Size {
    Size::new(LCD_W as u32, LCD_H as u32)
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Controller did not come out of reset
    Init,
    /// SPI transfer failed
    Interface,
}
