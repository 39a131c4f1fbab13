//! Last-on brightness memory in the durable byte store.
//!
//! One byte at a fixed offset.  Read and validated once at boot; written
//! only at power-off and only when it differs from what the store holds,
//! to spare the flash/EEPROM write cycles.

use log::{info, warn};

use crate::app::ports::{PersistentByteStore, StorageError};
use crate::error::Result;
use crate::fsm::Brightness;

/// Store offset of the last-on byte.
pub const LAST_ON_OFFSET: u8 = 0;

pub struct LastOnMemory {
    /// Byte the store is known to hold, if any.
    stored: Option<u8>,
}

impl LastOnMemory {
    /// Memory for a board without durable storage.
    pub fn volatile() -> Self {
        Self { stored: None }
    }

    /// Read the stored level.  Missing, unreadable, or out-of-range bytes
    /// fall back to `fallback`.
    pub fn restore(store: &mut impl PersistentByteStore, fallback: Brightness) -> (Self, Brightness) {
        match store.read_byte(LAST_ON_OFFSET) {
            Ok(byte) => {
                let memory = Self { stored: Some(byte) };
                match Brightness::from_byte(byte) {
                    Some(level) => {
                        info!("last-on: restored {:?}", level);
                        (memory, level)
                    }
                    None => {
                        warn!("last-on: invalid stored byte {:#04x}, using {:?}", byte, fallback);
                        (memory, fallback)
                    }
                }
            }
            Err(StorageError::NotFound) => {
                info!("last-on: nothing stored, using {:?}", fallback);
                (Self::volatile(), fallback)
            }
            Err(e) => {
                warn!("last-on: read failed ({}), using {:?}", e, fallback);
                (Self::volatile(), fallback)
            }
        }
    }

    /// Write `level` unless the store already holds it.
    /// Returns whether a write happened.
    pub fn persist(&mut self, store: &mut impl PersistentByteStore, level: Brightness) -> Result<bool> {
        let byte = level.to_byte();
        if self.stored == Some(byte) {
            return Ok(false);
        }
        store.write_byte(LAST_ON_OFFSET, byte)?;
        self.stored = Some(byte);
        info!("last-on: saved {:?}", level);
        Ok(true)
    }
}
