//! Single-colour status LED.
//!
//! Caches the last level written so the per-poll charge indicator only
//! touches the GPIO when the pattern actually changes.

use crate::app::ports::{GpioPort, OutputLine};

pub struct StatusLed {
    current: Option<bool>,
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn set(&mut self, gpio: &mut impl GpioPort, on: bool) {
        if self.current != Some(on) {
            gpio.write(OutputLine::StatusLed, on);
            self.current = Some(on);
        }
    }

    pub fn is_on(&self) -> bool {
        self.current.unwrap_or(false)
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
