//! One-shot hardware peripheral initialization and raw line access.
//!
//! Configures ADC channels, GPIO directions, and the LEDC timer/channel
//! using raw ESP-IDF sys calls.  Called once from `main()` before the
//! poll loop starts.  Host builds get a simulated backend with the same
//! function set, so the hardware adapter is testable off-target.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::{info, warn};

#[cfg(target_os = "espidf")]
use crate::pins;

/// LEDC channel carrying the driver enable PWM.
pub const LEDC_CH_DRIVER: u32 = 0;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the poll loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// poll-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::TEMP_ADC_CHANNEL, pins::CHARGE_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH{}=temp, CH{}=charge)", pins::TEMP_ADC_CHANNEL, pins::CHARGE_ADC_CHANNEL);
    Ok(())
}

/// Read one 12-bit sample; a failed conversion reads as 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract, single-threaded poll-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn input_config(pin: i32, pull_up: bool) -> gpio_config_t {
    gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    }
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Button is active-low against the internal pull-up; the accelerometer
    // drives its push-pull interrupt line itself.
    for cfg in [
        input_config(pins::BUTTON_GPIO, true),
        input_config(pins::ACCEL_INT_GPIO, false),
    ] {
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Drive the button pin high for a moment, then return it to a pulled-up
/// input.  Clears charge left on a floating switch line.
#[cfg(target_os = "espidf")]
pub fn reseat_button() {
    // SAFETY: The button pin is owned by the poll loop; the caller only
    // does this while the switch is open.
    let ret = unsafe { gpio_set_direction(pins::BUTTON_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT) };
    if ret != ESP_OK as i32 {
        warn!("hw_init: button reseat skipped, set_direction failed ({})", ret);
        return;
    }
    unsafe {
        gpio_set_level(pins::BUTTON_GPIO, 1);
        esp_rom_delay_us(10);
    }
    let ret = unsafe { gpio_config(&input_config(pins::BUTTON_GPIO, true)) };
    if ret != ESP_OK as i32 {
        warn!("hw_init: button input restore failed ({})", ret);
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::DRIVER_MODE_GPIO,
        pins::STATUS_LED_GPIO,
        pins::POWER_LATCH_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        // The latch is left alone here: the scheduler asserts it at boot.
        if pin != pins::POWER_LATCH_GPIO {
            unsafe { gpio_set_level(pin, 0) };
        }
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe { gpio_set_level(pin, u32::from(high)); }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::PWM_RESOLUTION_BITS as ledc_timer_bit_t,
        freq_hz: pins::DRIVER_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_DRIVER,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::DRIVER_ENABLE_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (driver=CH{}, {} Hz)", LEDC_CH_DRIVER, pins::DRIVER_PWM_FREQ_HZ);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: The channel was configured in init_ledc(); only the poll
    // loop writes duty.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub use sim::{adc1_read, gpio_read, gpio_write, ledc_set, reseat_button};

/// Simulated line state for host builds.  Inputs are set by tests,
/// outputs are read back.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, Ordering};

    const PINS: usize = 48;

    static LEVELS: [AtomicBool; PINS] = [const { AtomicBool::new(false) }; PINS];
    static ADC: [AtomicU16; 10] = [const { AtomicU16::new(0) }; 10];
    static DUTY: AtomicU8 = AtomicU8::new(0);
    static RESEATS: AtomicU32 = AtomicU32::new(0);

    fn slot(pin: i32) -> Option<&'static AtomicBool> {
        usize::try_from(pin).ok().and_then(|i| LEVELS.get(i))
    }

    pub fn gpio_read(pin: i32) -> bool {
        slot(pin).is_some_and(|s| s.load(Ordering::Relaxed))
    }

    pub fn gpio_write(pin: i32, high: bool) {
        if let Some(s) = slot(pin) {
            s.store(high, Ordering::Relaxed);
        }
    }

    pub fn adc1_read(channel: u32) -> u16 {
        ADC.get(channel as usize).map_or(0, |a| a.load(Ordering::Relaxed))
    }

    pub fn ledc_set(_channel: u32, duty: u8) {
        DUTY.store(duty, Ordering::Relaxed);
    }

    pub fn reseat_button() {
        RESEATS.fetch_add(1, Ordering::Relaxed);
    }

    /// Set a simulated input level.
    pub fn set_level(pin: i32, high: bool) {
        gpio_write(pin, high);
    }

    /// Set a simulated ADC sample.
    pub fn set_adc(channel: u32, raw: u16) {
        if let Some(a) = ADC.get(channel as usize) {
            a.store(raw, Ordering::Relaxed);
        }
    }

    pub fn duty() -> u8 {
        DUTY.load(Ordering::Relaxed)
    }

    pub fn reseats() -> u32 {
        RESEATS.load(Ordering::Relaxed)
    }
}
