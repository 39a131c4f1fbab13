//! System configuration parameters
//!
//! All timing constants, thresholds, and per-variant capabilities for the
//! handlight controller.  The three shipped product variants are expressed
//! as [`Preset`]s rather than separate firmware trees; the binary picks one
//! at build time.

use crate::app::ports::ConfigError;
use crate::fsm::Brightness;

/// Product variant.  Each preset fixes the inactivity window, the blink
/// exit timeout, and whether the board has durable storage and a soft
/// power latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// No durable storage, no power latch; any qualifying release leaves blink.
    Basic,
    /// No durable storage, no power latch; 2 s blink exit timeout.
    Standard,
    /// Durable last-on memory, hard power-off, 30 min inactivity window.
    Latching,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Latching => "latching",
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub preset: Preset,

    // --- Button timing ---
    /// Releases shorter than this are ignored while off (ms).
    pub short_press_floor_ms: u32,
    /// Minimum hold for a release to count while on (ms).
    pub press_debounce_ms: u32,
    /// Blocking settle pause after every observed level change (ms).
    pub settle_delay_ms: u32,
    /// Hold time that enters blink mode from off (ms).
    pub long_press_ms: u32,
    /// Re-press window after entering off that selects Low (ms).
    pub double_tap_window_ms: u32,
    /// Dwell after which a release in Low/Medium turns the light off (ms).
    pub off_timeout_ms: u32,
    /// Dwell required before a release leaves blink mode.
    /// `None` means any qualifying release exits.
    pub blink_exit_ms: Option<u32>,

    // --- Blink ---
    pub blink_period_ms: u32,
    pub blink_on_ms: u32,

    // --- Motion ---
    /// Time without tap/shake before the light switches itself off (ms).
    pub inactivity_window_ms: u32,
    /// Minimum spacing between two reported motion events.
    pub motion_report_interval_ms: Option<u32>,

    // --- Thermal ---
    /// Temperature (Celsius) above which the protective sequence runs.
    pub max_temperature_c: f32,
    /// Low/high alternations in the protective flash sequence.
    pub thermal_flash_cycles: u8,
    /// Duration of one flash phase (ms).
    pub thermal_flash_phase_ms: u32,

    // --- Charge indicator (raw ADC counts, 12-bit) ---
    pub charge_low_threshold: u16,
    pub charge_high_threshold: u16,

    // --- Housekeeping ---
    /// Period of the thermal / motion / float-guard pass (ms).
    pub housekeeping_interval_ms: u32,

    // --- Variant capabilities ---
    /// LastOnMode survives power cycles.
    pub durable_storage: bool,
    /// Entering Off schedules a release of the power latch.
    pub hard_power_off: bool,
    /// Delay between entering Off and releasing the power latch (ms).
    pub power_off_delay_ms: u32,
    /// LastOnMode used when nothing valid is stored.
    pub default_brightness: Brightness,
}

impl SystemConfig {
    /// Build the configuration for one of the shipped variants.
    pub fn preset(preset: Preset) -> Self {
        let base = Self {
            preset,

            // Button
            short_press_floor_ms: 20,
            press_debounce_ms: 50,
            settle_delay_ms: 50,
            long_press_ms: 500,
            double_tap_window_ms: 1_000,
            off_timeout_ms: 2_000,
            blink_exit_ms: Some(2_000),

            // Blink: 600 ms period, ~67% on
            blink_period_ms: 600,
            blink_on_ms: 400,

            // Motion
            inactivity_window_ms: 10 * 60 * 1_000,
            motion_report_interval_ms: None,

            // Thermal
            max_temperature_c: 60.0,
            thermal_flash_cycles: 6,
            thermal_flash_phase_ms: 100,

            // Charge
            charge_low_threshold: 1_000,
            charge_high_threshold: 3_000,

            housekeeping_interval_ms: 1_000,

            durable_storage: false,
            hard_power_off: false,
            power_off_delay_ms: 5_000,
            default_brightness: Brightness::Low,
        };

        match preset {
            Preset::Basic => Self {
                blink_exit_ms: None,
                ..base
            },
            Preset::Standard => base,
            Preset::Latching => Self {
                blink_exit_ms: Some(3_000),
                inactivity_window_ms: 30 * 60 * 1_000,
                motion_report_interval_ms: Some(500),
                durable_storage: true,
                hard_power_off: true,
                ..base
            },
        }
    }

    /// Range-check every field.  Called once before the firmware starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.press_debounce_ms < self.short_press_floor_ms {
            return Err(ConfigError::ValidationFailed(
                "press_debounce_ms must be >= short_press_floor_ms",
            ));
        }
        if self.long_press_ms <= self.settle_delay_ms {
            return Err(ConfigError::ValidationFailed(
                "long_press_ms must exceed settle_delay_ms",
            ));
        }
        if self.double_tap_window_ms == 0 || self.off_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "double_tap_window_ms and off_timeout_ms must be non-zero",
            ));
        }
        if self.blink_period_ms == 0 || self.blink_on_ms >= self.blink_period_ms {
            return Err(ConfigError::ValidationFailed(
                "blink_on_ms must be below a non-zero blink_period_ms",
            ));
        }
        if self.inactivity_window_ms < self.housekeeping_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "inactivity_window_ms must be at least one housekeeping interval",
            ));
        }
        if !(40.0..=120.0).contains(&self.max_temperature_c) {
            return Err(ConfigError::ValidationFailed(
                "max_temperature_c must be 40.0–120.0",
            ));
        }
        if self.thermal_flash_cycles == 0 {
            return Err(ConfigError::ValidationFailed(
                "thermal_flash_cycles must be non-zero",
            ));
        }
        if self.charge_low_threshold >= self.charge_high_threshold
            || self.charge_high_threshold > 4_095
        {
            return Err(ConfigError::ValidationFailed(
                "charge thresholds must satisfy low < high <= 4095",
            ));
        }
        if !(100..=5_000).contains(&self.housekeeping_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "housekeeping_interval_ms must be 100–5000",
            ));
        }
        if self.hard_power_off && self.power_off_delay_ms <= self.double_tap_window_ms {
            return Err(ConfigError::ValidationFailed(
                "power_off_delay_ms must outlast the double-tap window",
            ));
        }
        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::preset(Preset::Latching)
    }
}
