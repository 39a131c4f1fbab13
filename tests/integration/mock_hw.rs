//! Mock hardware adapter for integration tests.
//!
//! Records every line, duty and pause call so tests can assert on the full
//! command history without touching real GPIO/PWM registers.  Pausing
//! advances the mock clock, so blocking sequences cost simulated time.

#![allow(dead_code)]

use std::collections::HashMap;

use handlight::app::events::AppEvent;
use handlight::app::ports::{
    AccelerometerBus, AnalogChannel, BusError, ClockPort, EventSink, GpioPort, InputLine,
    OutputLine, PersistentByteStore, StorageError,
};
use handlight::config::{Preset, SystemConfig};
use handlight::fsm::Mode;
use handlight::scheduler::{Scheduler, TickOutcome};

/// Tilt register bits as the accelerometer reports them.
pub const TILT_TAP: u8 = 0x20;
pub const TILT_SHAKE: u8 = 0x80;

/// Raw NTC readings either side of the 60 °C limit.
pub const ROOM_RAW: u16 = 2048;
pub const HOT_RAW: u16 = 450;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Line(OutputLine, bool),
    Duty(u8),
    Pause(u32),
    Reseat,
    BusWrite(u8, u8),
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub now: u64,
    pub button: bool,
    pub accel_int: bool,
    pub tilt: u8,
    pub bus_down: bool,
    pub temp_raw: u16,
    pub charge_raw: u16,
    pub store: HashMap<u8, u8>,
    pub store_writes: u32,
    pub calls: Vec<HwCall>,
    pub lines: HashMap<OutputLine, bool>,
    pub duty: u8,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            now: 10_000,
            button: false,
            accel_int: false,
            tilt: 0,
            bus_down: false,
            temp_raw: ROOM_RAW,
            charge_raw: 2_000,
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

    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn bus_writes(&self) -> Vec<(u8, u8)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::BusWrite(r, v) => Some((*r, *v)),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for MockBoard {
    fn read(&mut self, line: InputLine) -> bool {
        match line {
            InputLine::Button => self.button,
            InputLine::AccelInterrupt => self.accel_int,
        }
    }

    fn write(&mut self, line: OutputLine, high: bool) {
        self.lines.insert(line, high);
        self.calls.push(HwCall::Line(line, high));
    }

    fn set_enable_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.calls.push(HwCall::Duty(duty));
    }

    fn read_analog(&mut self, channel: AnalogChannel) -> u16 {
        match channel {
            AnalogChannel::Temperature => self.temp_raw,
            AnalogChannel::Charge => self.charge_raw,
        }
    }

    fn reseat_button(&mut self) {
        self.calls.push(HwCall::Reseat);
    }
}

impl AccelerometerBus for MockBoard {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        if self.bus_down {
            return Err(BusError::NoAcknowledge);
        }
        self.calls.push(HwCall::BusWrite(register, value));
        Ok(())
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if self.bus_down {
            return Err(BusError::NoAcknowledge);
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = match register as usize + i {
                3 => {
                    self.accel_int = false;
                    std::mem::take(&mut self.tilt)
                }
                _ => 0,
            };
        }
        Ok(())
    }
}

impl PersistentByteStore for MockBoard {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError> {
        self.store.get(&offset).copied().ok_or(StorageError::NotFound)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError> {
        self.store_writes += 1;
        self.store.insert(offset, value);
        Ok(())
    }
}

impl ClockPort for MockBoard {
    fn now_ms(&mut self) -> u64 {
        self.now
    }

    fn pause_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
        self.calls.push(HwCall::Pause(ms));
    }
}

// ── EventLog ──────────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

impl EventLog {
    pub fn mode_changes(&self) -> Vec<(Mode, Mode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ModeChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: scheduler + board + event log ────────────────────────

pub struct Rig {
    pub sched: Scheduler,
    pub hw: MockBoard,
    pub log: EventLog,
}

impl Rig {
    pub fn boot(preset: Preset) -> Self {
        Self::boot_with(SystemConfig::preset(preset), MockBoard::new())
    }

    pub fn boot_with(config: SystemConfig, hw: MockBoard) -> Self {
        let mut rig = Self {
            sched: Scheduler::new(config),
            hw,
            log: EventLog::default(),
        };
        rig.sched.boot(&mut rig.hw, &mut rig.log);
        rig
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.sched.tick(&mut self.hw, &mut self.log)
    }

    pub fn mode(&self) -> Mode {
        self.sched.machine().mode()
    }

    /// Tick every `step_ms` until `ms` of simulated time has passed.
    pub fn run_for(&mut self, ms: u64, step_ms: u64) {
        let end = self.hw.now + ms;
        while self.hw.now < end {
            self.hw.now += step_ms;
            self.tick();
        }
    }

    /// Press, hold for `held_ms`, release.  One tick at each edge.
    pub fn click(&mut self, held_ms: u64) {
        let pressed_at = self.hw.now;
        self.hw.button = true;
        self.tick();
        self.hw.now = self.hw.now.max(pressed_at + held_ms);
        self.hw.button = false;
        self.tick();
    }

    /// Press and keep holding, ticking every 10 ms, until blink mode is
    /// entered or `limit_ms` passes.
    pub fn hold_until_blinking(&mut self, limit_ms: u64) {
        let end = self.hw.now + limit_ms;
        self.hw.button = true;
        self.tick();
        while self.mode() != Mode::Blinking && self.hw.now < end {
            self.hw.now += 10;
            self.tick();
        }
    }

    pub fn release(&mut self) {
        self.hw.now += 10;
        self.hw.button = false;
        self.tick();
    }

    /// Raise the interrupt line with `tilt` latched and poll once.
    pub fn motion(&mut self, tilt: u8) {
        self.hw.accel_int = true;
        self.hw.tilt = tilt;
        self.hw.now += 10;
        self.tick();
    }
}
