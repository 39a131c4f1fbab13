//! Hardware adapter: bridges real peripherals to the domain port traits.
//!
//! Owns the I²C accelerometer bus, the NVS byte store, the clock and a
//! blocking delay, and routes line access through [`hw_init`].  This is
//! the only module in the system that touches actual hardware.  On
//! non-espidf targets `hw_init` uses its simulated backend.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::adapters::i2c_bus::I2cAccelBus;
use crate::adapters::nvs::NvsByteStore;
use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{
    AccelerometerBus, AnalogChannel, BusError, ClockPort, GpioPort, InputLine, OutputLine,
    PersistentByteStore, StorageError,
};
use crate::drivers::hw_init;
use crate::pins;

/// Concrete adapter that combines all hardware behind the port traits.
pub struct HardwareAdapter<I, D> {
    accel: I2cAccelBus<I>,
    store: NvsByteStore,
    clock: Esp32TimeAdapter,
    delay: D,
}

impl<I: I2c, D: DelayNs> HardwareAdapter<I, D> {
    pub fn new(i2c: I, store: NvsByteStore, delay: D) -> Self {
        Self {
            accel: I2cAccelBus::new(i2c),
            store,
            clock: Esp32TimeAdapter::new(),
            delay,
        }
    }
}

const fn output_pin(line: OutputLine) -> i32 {
    match line {
        OutputLine::StatusLed => pins::STATUS_LED_GPIO,
        OutputLine::DriverMode => pins::DRIVER_MODE_GPIO,
        OutputLine::PowerLatch => pins::POWER_LATCH_GPIO,
    }
}

// ── GpioPort implementation ───────────────────────────────────

impl<I: I2c, D: DelayNs> GpioPort for HardwareAdapter<I, D> {
    fn read(&mut self, line: InputLine) -> bool {
        match line {
            // Active-low against the pull-up.
            InputLine::Button => !hw_init::gpio_read(pins::BUTTON_GPIO),
            InputLine::AccelInterrupt => hw_init::gpio_read(pins::ACCEL_INT_GPIO),
        }
    }

    fn write(&mut self, line: OutputLine, high: bool) {
        hw_init::gpio_write(output_pin(line), high);
    }

    fn set_enable_duty(&mut self, duty: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_DRIVER, duty);
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Temperature => hw_init::adc1_read(pins::TEMP_ADC_CHANNEL),
            AnalogChannel::Charge => hw_init::adc1_read(pins::CHARGE_ADC_CHANNEL),
        }
    }

    fn reseat_button(&mut self) {
        hw_init::reseat_button();
    }
}

// ── AccelerometerBus implementation ───────────────────────────

impl<I: I2c, D: DelayNs> AccelerometerBus for HardwareAdapter<I, D> {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.accel.write_register(register, value)
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.accel.read_registers(register, buf)
    }
}

// ── PersistentByteStore implementation ────────────────────────

impl<I: I2c, D: DelayNs> PersistentByteStore for HardwareAdapter<I, D> {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError> {
        self.store.read_byte(offset)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError> {
        self.store.write_byte(offset, value)
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl<I: I2c, D: DelayNs> ClockPort for HardwareAdapter<I, D> {
    fn now_ms(&mut self) -> u64 {
        self.clock.uptime_ms()
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
