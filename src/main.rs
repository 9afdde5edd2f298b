#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select4, Either4};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Ticker, Timer};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use modern_watchface::{host::BatteryCharge, ClockHost, Config, Event, Watchface};
use peripherals::{
    battery::BatteryStatus,
    display::{BacklightPins, Brightness, Display},
    vibration::VibrationMotor,
};
use system::{
    companion,
    config::chip_config,
    host::{PineTimeHost, NOTIFY},
    time::{TimeManager, TimeReference},
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i64 = Config::DEFAULT.utc_offset_hours as i64 * 3_600;

// Communication channels
static BATTERY_STATUS: Signal<ThreadModeRawMutex, BatteryCharge> = Signal::new();

/// Vibrate whenever a notification is signaled
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut motor: VibrationMotor<'static>) {
    loop {
        // Vibrate signaled amount of times
        let count = NOTIFY.wait().await;
        match count {
            1 => motor.pulse_once(Some(200)).await,
            _ => motor.pulse_times(Some(200), count).await,
        }
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: BatteryStatus<'static>) {
    loop {
        if battery.update().await {
            let status = battery.info();
            defmt::info!(
                "Battery status: {} ({})",
                status.percent,
                if status.charging {
                    "charging"
                } else {
                    "discharging"
                }
            );
            BATTERY_STATUS.signal(status);
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Run the watchface, one event at a time.
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(host: PineTimeHost) {
    let mut watchface = match Watchface::start(host, Config::DEFAULT) {
        Ok(watchface) => watchface,
        Err(e) => {
            defmt::error!("watchface failed to start: {}", e);
            return;
        }
    };
    watchface.host_mut().flush();

    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        match select4(
            tick.next(),
            BATTERY_STATUS.wait(),
            companion::CONNECTION.wait(),
            companion::INBOX.receive(),
        )
        .await
        {
            Either4::First(()) => {
                let now = watchface.host().now();
                dispatch(&mut watchface, Event::Tick(now));
            }
            Either4::Second(charge) => dispatch(&mut watchface, Event::Battery(charge)),
            Either4::Third(connected) => dispatch(&mut watchface, Event::Bluetooth(connected)),
            Either4::Fourth(delivery) => dispatch(&mut watchface, delivery.as_event()),
        }

        watchface.host_mut().flush();
    }
}

fn dispatch(watchface: &mut Watchface<PineTimeHost>, event: Event<'_>) {
    if watchface.host_mut().accept(&event) {
        watchface.handle(event);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(chip_config());
    defmt::info!("Initializing");

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initalize Battery
    let battery = BatteryStatus::init(Input::new(p.P0_12, Pull::None), saadc).await;

    // Initialize vibration motor
    let vibration = VibrationMotor::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = BacklightPins::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    ));
    display.set_brightness(Brightness::Medium);

    // Wall clock starts at the build time
    let time = TimeManager::init(TimeReference::from_timestamp(UTC_EPOCH), TIMEZONE);
    let host = PineTimeHost::new(time, display, battery.info());

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(notify(vibration)));
    unwrap!(spawner.spawn(run_watchface(host)));
}
