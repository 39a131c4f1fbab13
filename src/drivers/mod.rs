//! Line-level drivers: light output, button, status LED, accelerometer,
//! and one-shot hardware initialisation.

pub mod accelerometer;
pub mod button;
pub mod hw_init;
pub mod light;
pub mod status_led;
