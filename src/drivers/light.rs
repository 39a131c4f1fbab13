//! LED driver output stage.
//!
//! Two lines set the emitted level: the driver enable line, PWM'd for
//! brightness, and the driver mode line selecting the low- or
//! high-current path.
//!
//! | Level   | enable duty | mode line |
//! |---------|-------------|-----------|
//! | Off     | 0           | low       |
//! | Low     | 40          | low       |
//! | Medium  | 255         | low       |
//! | High    | 255         | high      |

use crate::app::ports::{GpioPort, OutputLine};
use crate::fsm::Brightness;

/// Enable duty used for the dim level on the low-current path.
const LOW_DUTY: u8 = 40;

/// One complete command for the driver lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightOutput {
    /// Enable line PWM duty (0–255).
    pub duty: u8,
    /// `true` selects the high-current path.
    pub high_range: bool,
}

impl LightOutput {
    pub const OFF: Self = Self {
        duty: 0,
        high_range: false,
    };

    pub const fn for_brightness(level: Brightness) -> Self {
        match level {
            Brightness::Low => Self {
                duty: LOW_DUTY,
                high_range: false,
            },
            Brightness::Medium => Self {
                duty: u8::MAX,
                high_range: false,
            },
            Brightness::High => Self {
                duty: u8::MAX,
                high_range: true,
            },
        }
    }

    /// Drive both lines.  The mode line is set first when leaving the
    /// high path and last when entering it, so the driver never sees full
    /// duty on the wrong current range.
    pub fn apply(self, gpio: &mut impl GpioPort) {
        if self.high_range {
            gpio.set_enable_duty(self.duty);
            gpio.write(OutputLine::DriverMode, true);
        } else {
            gpio.write(OutputLine::DriverMode, false);
            gpio.set_enable_duty(self.duty);
        }
    }
}
