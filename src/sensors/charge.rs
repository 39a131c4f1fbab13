//! Charge-controller status input.
//!
//! The charger's status pin is tri-state and sits behind a divider, so a
//! single analog reading lands in one of three bands.  No hysteresis: a
//! reading exactly on a threshold counts as idle.

use crate::config::SystemConfig;

/// Bit of the millisecond counter that paces the charging blink
/// (toggles every 256 ms, ~2 Hz).
const BLINK_BIT: u64 = 0x100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeState {
    /// Below the low threshold: charger is pulling the pin down.
    Charging,
    /// Above the high threshold: charge complete.
    Charged,
    /// In between: no charger attached.
    Idle,
}

pub struct ChargeIndicator {
    low: u16,
    high: u16,
}

impl ChargeIndicator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            low: config.charge_low_threshold,
            high: config.charge_high_threshold,
        }
    }

    pub fn classify(&self, raw: u16) -> ChargeState {
        if raw < self.low {
            ChargeState::Charging
        } else if raw > self.high {
            ChargeState::Charged
        } else {
            ChargeState::Idle
        }
    }

    /// Status LED level for `raw` at time `now_ms`.
    pub fn led_level(&self, raw: u16, now_ms: u64) -> bool {
        match self.classify(raw) {
            ChargeState::Charging => now_ms & BLINK_BIT != 0,
            ChargeState::Charged => true,
            ChargeState::Idle => false,
        }
    }
}
