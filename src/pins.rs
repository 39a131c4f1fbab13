//! GPIO / peripheral pin assignments for the handlight controller board.
//!
//! Every driver references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// LED driver (constant-current buck with a high-range sense resistor)
// ---------------------------------------------------------------------------

/// LEDC PWM output on the driver's enable/dim pin.
pub const DRIVER_ENABLE_GPIO: i32 = 1;
/// Digital output: HIGH selects the high-current sense path.
pub const DRIVER_MODE_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Power
// ---------------------------------------------------------------------------

/// Digital output holding the soft-latch MOSFET on.  Released at power-off.
pub const POWER_LATCH_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Charge controller status pin behind a divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const CHARGE_ADC_CHANNEL: u32 = 4;

/// NTC thermistor on the LED board, 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_CHANNEL: u32 = 8;

// ---------------------------------------------------------------------------
// Accelerometer (MMA7660 on I²C)
// ---------------------------------------------------------------------------

/// Push-pull, active-high interrupt line (tap / shake).
pub const ACCEL_INT_GPIO: i32 = 7;

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
/// Standard-mode bus clock.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Status LED (single discrete LED)
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the driver enable line (20 kHz, above audible range).
pub const DRIVER_PWM_FREQ_HZ: u32 = 20_000;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary tail-cap switch.
pub const BUTTON_GPIO: i32 = 16;
