//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Scheduler / monitors / state machine (domain)
//! ```
//!
//! Driven adapters (GPIO + analog, accelerometer bus, durable store, clock,
//! event sinks) implement these traits.  The
//! [`Scheduler`](crate::scheduler::Scheduler) consumes them via generics, so
//! the domain core never touches hardware directly and every behaviour can
//! be exercised against a fake board on the host.

// ───────────────────────────────────────────────────────────────
// Line identities
// ───────────────────────────────────────────────────────────────

/// Digital inputs the domain samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputLine {
    /// Momentary push-button.  `true` = pressed (adapters undo the
    /// active-low wiring).
    Button,
    /// Accelerometer interrupt output (active high).
    AccelInterrupt,
}

/// Digital outputs the domain drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLine {
    /// Single status LED (charge indicator).
    StatusLed,
    /// LED driver current path: `true` selects the high-current range.
    DriverMode,
    /// Soft power latch: `true` keeps the regulator on.
    PowerLatch,
}

/// Fixed analog channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogChannel {
    /// NTC thermistor divider.
    Temperature,
    /// Charge controller status divider.
    Charge,
}

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Digital and analog pin access.
pub trait GpioPort {
    /// Sample a digital input.
    fn read(&mut self, line: InputLine) -> bool;

    /// Drive a digital output.
    fn write(&mut self, line: OutputLine, high: bool);

    /// Set the LED driver enable line PWM duty (0 = off, 255 = fully on).
    fn set_enable_duty(&mut self, duty: u8);

    /// One conversion on a fixed analog channel (12-bit raw counts).
    fn read_analog(&mut self, channel: AnalogChannel) -> u16;

    /// Briefly switch the button pin to an output and back to an input
    /// with pull-up, so a floating line settles to its idle level.
    fn reseat_button(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Accelerometer bus port
// ───────────────────────────────────────────────────────────────

/// Register-level access to the motion sensor.
pub trait AccelerometerBus {
    /// Write one register.
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError>;

    /// Read `buf.len()` consecutive registers starting at `register`.
    /// The register pointer write and the read are joined by a repeated
    /// start so the bus is never released between them.
    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError>;
}

// ───────────────────────────────────────────────────────────────
// Durable byte store port
// ───────────────────────────────────────────────────────────────

/// One-byte-per-offset durable storage (EEPROM / NVS).
pub trait PersistentByteStore {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError>;

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus the firmware's only suspension point.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&mut self) -> u64;

    /// Block the polling loop.  Fakes advance their time instead of
    /// sleeping.
    fn pause_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Board bundle
// ───────────────────────────────────────────────────────────────

/// Everything the scheduler needs from the board in one bound.
pub trait Board: GpioPort + AccelerometerBus + PersistentByteStore + ClockPort {}

impl<T> Board for T where T: GpioPort + AccelerometerBus + PersistentByteStore + ClockPort {}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`AccelerometerBus`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Address or data byte was not acknowledged.
    NoAcknowledge,
    /// Lost arbitration to another controller.
    ArbitrationLoss,
    /// Bus-level fault (stuck line, overrun, driver error).
    Bus,
}

/// Errors from [`PersistentByteStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing has been written at this offset yet.
    NotFound,
    /// Generic I/O error.
    IoError,
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoAcknowledge => write!(f, "no acknowledge"),
            Self::ArbitrationLoss => write!(f, "arbitration lost"),
            Self::Bus => write!(f, "bus fault"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
