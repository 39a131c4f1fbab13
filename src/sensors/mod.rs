//! Sensor subsystem: temperature, charge status and motion.

pub mod charge;
pub mod motion;
pub mod temperature;
