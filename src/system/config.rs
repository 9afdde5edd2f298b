//! Chip configuration for the PineTime

use embassy_nrf::config::{Config, Debug, HfclkSource, LfclkSource};

/// Settings handed to `embassy_nrf::init`.
pub fn chip_config() -> Config {
    let mut config = Config::default();

    // 32 MHz and 32.768 kHz crystals are fitted on the board
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;

    // DC/DC converter for REG1 cuts the current draw of the SoC
    config.dcdc.reg1 = true;

    // RTT logging needs the debug port
    config.debug = Debug::Allowed;

    config
}
