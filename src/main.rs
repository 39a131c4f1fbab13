//! Handlight Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                         LogEventSink          │
//! │  (GPIO · ADC · LEDC · I²C · NVS · clock) (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Scheduler (pure logic)                    │    │
//! │  │  Mode FSM · Motion · Thermal · Charge · Last-on        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info};

use handlight::adapters::hardware::HardwareAdapter;
use handlight::adapters::log_sink::LogEventSink;
use handlight::adapters::nvs::NvsByteStore;
use handlight::config::SystemConfig;
use handlight::drivers::hw_init;
use handlight::error::Error;
use handlight::pins;
use handlight::scheduler::{Scheduler, TickOutcome};

/// Idle period once the latch has been released and the rail is falling.
const POWERED_DOWN_IDLE_MS: u32 = 1_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Handlight v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!("Config: {} preset", config.preset.name());

    // ── 3. Hardware peripherals ───────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Nothing can be driven safely without the peripherals.
        error!("HAL init failed: {}, halting", e);
        loop {
            FreeRtos::delay_ms(POWERED_DOWN_IDLE_MS);
        }
    }

    let peripherals = Peripherals::take()?;
    // SDA/SCL on pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;

    let store = NvsByteStore::new().map_err(Error::from)?;

    let mut hw = HardwareAdapter::new(i2c, store, Delay::new_default());
    let mut sink = LogEventSink::new();

    // ── 4. Boot + poll loop ───────────────────────────────────
    let mut scheduler = Scheduler::new(config);
    scheduler.boot(&mut hw, &mut sink);

    loop {
        if scheduler.tick(&mut hw, &mut sink) == TickOutcome::PoweredDown {
            // Latch released; on battery the rail collapses here.  On
            // charger power the board idles until unplugged.
            FreeRtos::delay_ms(POWERED_DOWN_IDLE_MS);
        }
    }
}
