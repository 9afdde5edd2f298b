//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};
use modern_watchface::host::BatteryCharge;

pub struct BatteryStatus<'a> {
    /// Pin P0.12: High = battery, Low = charging
    pin_charge_indication: Input<'a, P0_12>,

    /// Saadc instance, pin P0.31 samples half the battery voltage
    saadc: Saadc<'a, 1>,

    /// Last reported state
    info: BatteryCharge,
}

impl<'a> BatteryStatus<'a> {
    /// Initialize battery status
    pub async fn init(pin_charge_indication: Input<'a, P0_12>, saadc: Saadc<'a, 1>) -> Self {
        let mut battery = Self {
            pin_charge_indication,
            saadc,
            info: BatteryCharge {
                percent: 0,
                charging: false,
            },
        };
        battery.info = battery.measure().await;
        battery
    }

    /// Return the last measured battery state.
    ///
    /// To fetch current data, call `update()` first.
    pub fn info(&self) -> BatteryCharge {
        self.info
    }

    /// Update the battery status from the hardware. Return whether the
    /// percentage or the charging state changed.
    pub async fn update(&mut self) -> bool {
        let info = self.measure().await;
        let changed = info != self.info;
        self.info = info;
        changed
    }

    async fn measure(&mut self) -> BatteryCharge {
        let charging = self.pin_charge_indication.is_low();

        let mut buf = [0; 1];
        self.saadc.sample(&mut buf).await;
        let percent = match convert_adc_measurement(buf[0]) {
            Ok(millivolts) => percent_from_millivolts(millivolts),
            Err(e) => {
                defmt::warn!("battery measurement failed: {}", e);
                self.info.percent
            }
        };

        BatteryCharge { percent, charging }
    }
}

/// Convert a 12 bit ADC measurement into the battery voltage in millivolts.
fn convert_adc_measurement(raw_measurement: i16) -> Result<u16, Error> {
    match raw_measurement {
        0..=4095 => {
            // Voltage divider halves the battery voltage, reference is 3.3 V
            let adc_val = raw_measurement as u32;
            Ok((adc_val * 2000 / 1241) as u16)
        }
        _ => Err(Error::InvalidMeasurement),
    }
}

/// Estimate the charge from the cell voltage.
///
/// Linear interpolation between fixed points of the discharge curve.
fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    InvalidMeasurement,
}
