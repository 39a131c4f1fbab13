//! Accelerometer bus adapter over any blocking `embedded-hal` I²C master.
//!
//! Register writes are a two-byte write; register reads are a pointer
//! write followed by a repeated-start read (`write_read`).  Bus errors
//! are folded into the port's [`BusError`] by their [`ErrorKind`].

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::app::ports::{AccelerometerBus, BusError};
use crate::drivers::accelerometer::ADDRESS;

pub struct I2cAccelBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cAccelBus<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            address: ADDRESS,
        }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

fn map_kind(kind: ErrorKind) -> BusError {
    match kind {
        ErrorKind::NoAcknowledge(_) => BusError::NoAcknowledge,
        ErrorKind::ArbitrationLoss => BusError::ArbitrationLoss,
        _ => BusError::Bus,
    }
}

impl<I: I2c> AccelerometerBus for I2cAccelBus<I> {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| map_kind(e.kind()))
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .map_err(|e| map_kind(e.kind()))
    }
}
