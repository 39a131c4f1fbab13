//! In-crate fake board for unit tests.
//!
//! Implements every port over plain fields so tests can script inputs and
//! assert on the recorded output history.  Pausing advances the fake clock.

use std::collections::HashMap;

use crate::app::events::AppEvent;
use crate::app::ports::{
    AccelerometerBus, AnalogChannel, BusError, ClockPort, EventSink, GpioPort, InputLine,
    OutputLine, PersistentByteStore, StorageError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    Write(OutputLine, bool),
    Duty(u8),
    Pause(u32),
    Reseat,
    BusWrite(u8, u8),
}

pub struct FakeBoard {
    pub now: u64,
    pub button: bool,
    pub accel_int: bool,
    pub tilt: u8,
    pub axes: [u8; 3],
    /// Axis reads that come back with the alert bit before real data.
    pub alert_reads: u32,
    pub bus_fail: bool,
    pub temp_raw: u16,
    pub charge_raw: u16,
    pub store: HashMap<u8, u8>,
    pub store_writes: u32,
    pub calls: Vec<BoardCall>,
    pub lines: HashMap<OutputLine, bool>,
    pub duty: u8,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            now: 10_000,
            button: false,
            accel_int: false,
            tilt: 0,
            axes: [0; 3],
            alert_reads: 0,
            bus_fail: false,
            // ~25 °C on the NTC divider, charge input floating mid-band.
            temp_raw: 2048,
            charge_raw: 2048,
            store: HashMap::new(),
            store_writes: 0,
            calls: Vec::new(),
            lines: HashMap::new(),
            duty: 0,
        }
    }

    pub fn line(&self, line: OutputLine) -> bool {
        self.lines.get(&line).copied().unwrap_or(false)
    }

    pub fn pauses(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Pause(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

impl GpioPort for FakeBoard {
    fn read(&mut self, line: InputLine) -> bool {
        match line {
            InputLine::Button => self.button,
            InputLine::AccelInterrupt => self.accel_int,
        }
    }

    fn write(&mut self, line: OutputLine, high: bool) {
        self.lines.insert(line, high);
        self.calls.push(BoardCall::Write(line, high));
    }

    fn set_enable_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.calls.push(BoardCall::Duty(duty));
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Temperature => self.temp_raw,
            AnalogChannel::Charge => self.charge_raw,
        }
    }

    fn reseat_button(&mut self) {
        self.calls.push(BoardCall::Reseat);
    }
}

impl AccelerometerBus for FakeBoard {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        if self.bus_fail {
            return Err(BusError::NoAcknowledge);
        }
        self.calls.push(BoardCall::BusWrite(register, value));
        Ok(())
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if self.bus_fail {
            return Err(BusError::NoAcknowledge);
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            let reg = register as usize + i;
            *byte = match reg {
                0..=2 if self.alert_reads > 0 => {
                    self.alert_reads -= 1;
                    0x40
                }
                0..=2 => self.axes[reg],
                3 => {
                    // Reading TILT clears the interrupt on the part.
                    self.accel_int = false;
                    self.tilt
                }
                _ => 0,
            };
        }
        Ok(())
    }
}

impl PersistentByteStore for FakeBoard {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError> {
        self.store.get(&offset).copied().ok_or(StorageError::NotFound)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError> {
        self.store_writes += 1;
        self.store.insert(offset, value);
        Ok(())
    }
}

impl ClockPort for FakeBoard {
    fn now_ms(&mut self) -> u64 {
        self.now
    }

    fn pause_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
        self.calls.push(BoardCall::Pause(ms));
    }
}

/// Collects every emitted event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
