//! MMA7660-class 3-axis accelerometer.
//!
//! Only the handful of registers the firmware uses are modelled:
//!
//! | Reg  | Name  | Use                                              |
//! |------|-------|--------------------------------------------------|
//! | 0x00 | XOUT  | 6-bit axis sample, bit 6 = alert, bit 5 = sign   |
//! | 0x01 | YOUT  | "                                                |
//! | 0x02 | ZOUT  | "                                                |
//! | 0x03 | TILT  | bit 5 = tap, bit 7 = shake                       |
//! | 0x06 | INTSU | interrupt sources                                |
//! | 0x07 | MODE  | standby / active, INT pin drive                  |
//! | 0x08 | SR    | sample rate                                      |
//! | 0x09 | PDET  | tap detection threshold                          |
//! | 0x0A | PD    | tap debounce count                               |
//!
//! An axis register read while the part is updating it carries the alert
//! bit and must be re-read.

use log::info;

use crate::app::ports::{AccelerometerBus, BusError};

/// 7-bit bus address.
pub const ADDRESS: u8 = 0x4C;

pub const REG_XOUT: u8 = 0x00;
pub const REG_YOUT: u8 = 0x01;
pub const REG_ZOUT: u8 = 0x02;
pub const REG_TILT: u8 = 0x03;
pub const REG_INTSU: u8 = 0x06;
pub const REG_MODE: u8 = 0x07;
pub const REG_SR: u8 = 0x08;
pub const REG_PDET: u8 = 0x09;
pub const REG_PD: u8 = 0x0A;

const TILT_TAP: u8 = 1 << 5;
const TILT_SHAKE: u8 = 1 << 7;
const AXIS_ALERT: u8 = 1 << 6;
const AXIS_SIGN: u8 = 1 << 5;
const AXIS_MAGNITUDE: u8 = 0x3F;

const MODE_STANDBY: u8 = 0x00;
/// Active, push-pull, active-high interrupt.
const MODE_ACTIVE: u8 = 0xC1;
/// Shake on X/Y/Z plus tap.
const INTSU_SHAKE_TAP: u8 = 0xE4;
/// 120 samples/s active rate.
const SR_120: u8 = 0x00;
const TAP_THRESHOLD: u8 = 0x0B;
const TAP_DEBOUNCE: u8 = 0x0A;

/// Decoded TILT register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TiltStatus {
    pub tap: bool,
    pub shake: bool,
}

impl TiltStatus {
    pub fn from_register(raw: u8) -> Self {
        Self {
            tap: raw & TILT_TAP != 0,
            shake: raw & TILT_SHAKE != 0,
        }
    }

    pub fn any(self) -> bool {
        self.tap || self.shake
    }
}

/// Signed 6-bit sample per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axes {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

/// Sign-extend a 6-bit axis value (alert bit already known clear).
pub fn decode_axis(raw: u8) -> i8 {
    if raw & AXIS_SIGN != 0 {
        (raw | 0xC0) as i8
    } else {
        (raw & AXIS_MAGNITUDE) as i8
    }
}

/// Put the part into standby, program tap/shake interrupts, and activate.
/// Register writes only take effect in standby, hence the bracket.
pub fn configure(bus: &mut impl AccelerometerBus) -> Result<(), BusError> {
    bus.write_register(REG_MODE, MODE_STANDBY)?;
    bus.write_register(REG_INTSU, INTSU_SHAKE_TAP)?;
    bus.write_register(REG_SR, SR_120)?;
    bus.write_register(REG_PDET, TAP_THRESHOLD)?;
    bus.write_register(REG_PD, TAP_DEBOUNCE)?;
    bus.write_register(REG_MODE, MODE_ACTIVE)?;
    info!("accelerometer: tap/shake interrupts armed");
    Ok(())
}

pub fn read_tilt(bus: &mut impl AccelerometerBus) -> Result<TiltStatus, BusError> {
    let mut buf = [0u8; 1];
    bus.read_registers(REG_TILT, &mut buf)?;
    Ok(TiltStatus::from_register(buf[0]))
}

/// Read one axis register, retrying for as long as the alert bit is set.
pub fn read_axis(bus: &mut impl AccelerometerBus, register: u8) -> Result<i8, BusError> {
    let mut buf = [0u8; 1];
    loop {
        bus.read_registers(register, &mut buf)?;
        if buf[0] & AXIS_ALERT == 0 {
            return Ok(decode_axis(buf[0]));
        }
    }
}

pub fn read_axes(bus: &mut impl AccelerometerBus) -> Result<Axes, BusError> {
    Ok(Axes {
        x: read_axis(bus, REG_XOUT)?,
        y: read_axis(bus, REG_YOUT)?,
        z: read_axis(bus, REG_ZOUT)?,
    })
}
