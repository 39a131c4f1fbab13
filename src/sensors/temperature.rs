//! NTC thermistor temperature sensor (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! the ESP32-S3 ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature.

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Reported when the divider sits at either rail (open or shorted NTC).
pub const RAIL_CELSIUS: f32 = -40.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub raw: u16,
    pub celsius: f32,
}

impl TemperatureReading {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            celsius: adc_to_celsius(raw),
        }
    }
}

pub fn adc_to_celsius(raw: u16) -> f32 {
    let voltage = (raw as f32 / ADC_MAX) * V_REF;
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return RAIL_CELSIUS;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return RAIL_CELSIUS;
    }
    (1.0 / inv_t) - 273.15
}
