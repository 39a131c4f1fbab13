//! Thermal protection.
//!
//! Runs from the once-per-second housekeeping pass.  Every pass samples
//! the NTC and reports the reading.  If the light is on and the reading
//! exceeds the configured limit the protector takes over the driver lines:
//!
//! 1. Alternate low / high brightness `thermal_flash_cycles` times, one
//!    `thermal_flash_phase_ms` pause per phase.  This blocks the poll
//!    loop (~1.2 s with the shipped values); the button is not sampled.
//! 2. Drive the low level.
//! 3. Ask the state machine to settle in `Low` so the mode and the
//!    physical output agree.
//!
//! A still-hot light repeats the flash after a full housekeeping interval
//! of steady low output, until it cools down.

use log::{debug, error};

use crate::app::ports::{AnalogChannel, ClockPort, GpioPort};
use crate::config::SystemConfig;
use crate::drivers::light::LightOutput;
use crate::fsm::{Brightness, Mode, ModeStateMachine, Transition};
use crate::sensors::temperature::TemperatureReading;

/// Outcome of one thermal pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalCheck {
    pub reading: TemperatureReading,
    /// The protective sequence ran.
    pub tripped: bool,
    /// Mode change requested after the sequence.
    pub transition: Option<Transition>,
}

pub struct ThermalProtector {
    max_temp_c: f32,
    flash_cycles: u8,
    phase_ms: u32,
}

impl ThermalProtector {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            max_temp_c: config.max_temperature_c,
            flash_cycles: config.thermal_flash_cycles,
            phase_ms: config.thermal_flash_phase_ms,
        }
    }

    /// Sample the sensor and run the protective sequence if needed.
    pub fn check<H>(&mut self, hw: &mut H, sm: &mut ModeStateMachine) -> ThermalCheck
    where
        H: GpioPort + ClockPort,
    {
        let reading = TemperatureReading::from_raw(hw.read_analog(AnalogChannel::Temperature));
        debug!("thermal: {:.1}\u{00b0}C raw={}", reading.celsius, reading.raw);

        if reading.celsius <= self.max_temp_c || sm.mode() == Mode::Off {
            return ThermalCheck {
                reading,
                tripped: false,
                transition: None,
            };
        }

        error!(
            "THERMAL: {:.1}\u{00b0}C exceeds {:.1}\u{00b0}C limit, dropping to low",
            reading.celsius, self.max_temp_c
        );
        self.flash(hw);
        LightOutput::for_brightness(Brightness::Low).apply(hw);

        let now = hw.now_ms();
        ThermalCheck {
            reading,
            tripped: true,
            transition: sm.force_low(now),
        }
    }

    fn flash<H>(&self, hw: &mut H)
    where
        H: GpioPort + ClockPort,
    {
        let low = LightOutput::for_brightness(Brightness::Low);
        let high = LightOutput::for_brightness(Brightness::High);
        for _ in 0..self.flash_cycles {
            low.apply(hw);
            hw.pause_ms(self.phase_ms);
            high.apply(hw);
            hw.pause_ms(self.phase_ms);
        }
    }
}
