//! Unified error types for the handlight firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the boot path's error handling uniform.  All variants are `Copy` so
//! they can be logged and dropped inside the polling loop without
//! allocation.

use core::fmt;

use crate::app::ports::{BusError, ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The accelerometer bus rejected a transfer.
    Bus(BusError),
    /// The durable byte store failed.
    Storage(StorageError),
    /// Configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
