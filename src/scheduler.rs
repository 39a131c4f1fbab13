//! Poll-loop driver.
//!
//! One cooperative loop, no preemption.  Each call to [`Scheduler::tick`]
//! runs the full body in a fixed order:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. clock + button sample   (50 ms settle pause on an edge)   │
//! │ 2. transition table        (ModeStateMachine::evaluate)      │
//! │ 3. motion interrupt poll   (tap / shake → deadline reset)    │
//! │ 4. housekeeping, 1 Hz      (float guard, thermal, auto-off)  │
//! │ 5. blink square wave + driver lines                          │
//! │ 6. charge indicator → status LED                             │
//! │ 7. pending power-off       (latching variant only)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All hardware is reached through the [`Board`] bound, so the same loop
//! runs against the ESP-IDF adapter and the host fakes.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::persistence::LastOnMemory;
use crate::app::ports::{AnalogChannel, Board, EventSink, OutputLine};
use crate::config::SystemConfig;
use crate::diagnostics::RuntimeStats;
use crate::drivers::accelerometer;
use crate::drivers::button::ButtonDebouncer;
use crate::drivers::light::LightOutput;
use crate::drivers::status_led::StatusLed;
use crate::fsm::{ModeStateMachine, Transition};
use crate::safety::ThermalProtector;
use crate::sensors::charge::ChargeIndicator;
use crate::sensors::motion::MotionMonitor;

// ═══════════════════════════════════════════════════════════════
//  Periodic gate
// ═══════════════════════════════════════════════════════════════

/// Fires at most once per interval, measured from the last fire.
#[derive(Debug, Clone, Copy)]
pub struct OnceEvery {
    interval_ms: u64,
    last_fire_ms: u64,
}

impl OnceEvery {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_fire_ms: 0,
        }
    }

    /// Restart the interval from `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_fire_ms = now_ms;
    }

    /// `true` (and re-arm) once a full interval has elapsed.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_fire_ms) >= self.interval_ms {
            self.last_fire_ms = now_ms;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The power latch has been released; the board is about to lose
    /// power and further ticks do nothing.
    PoweredDown,
}

pub struct Scheduler {
    config: SystemConfig,
    machine: ModeStateMachine,
    button: ButtonDebouncer,
    motion: MotionMonitor,
    thermal: ThermalProtector,
    charge: ChargeIndicator,
    status_led: StatusLed,
    housekeeping: OnceEvery,
    memory: LastOnMemory,
    stats: RuntimeStats,
    /// Last command written to the driver lines.
    applied: Option<LightOutput>,
    powered_down: bool,
}

impl Scheduler {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            machine: ModeStateMachine::new(config.clone(), config.default_brightness),
            button: ButtonDebouncer::new(config.settle_delay_ms),
            motion: MotionMonitor::new(&config),
            thermal: ThermalProtector::new(&config),
            charge: ChargeIndicator::new(&config),
            status_led: StatusLed::new(),
            housekeeping: OnceEvery::new(config.housekeeping_interval_ms),
            memory: LastOnMemory::volatile(),
            stats: RuntimeStats::new(),
            applied: None,
            powered_down: false,
            config,
        }
    }

    /// Bring the board up: hold power, restore last-on, arm the
    /// accelerometer, and enter `Off`.
    pub fn boot<B: Board>(&mut self, hw: &mut B, sink: &mut impl EventSink) {
        info!("boot: {} preset", self.config.preset.name());

        if self.config.hard_power_off {
            hw.write(OutputLine::PowerLatch, true);
        }

        let last_on = if self.config.durable_storage {
            let (memory, level) = LastOnMemory::restore(hw, self.config.default_brightness);
            self.memory = memory;
            level
        } else {
            self.config.default_brightness
        };
        self.machine = ModeStateMachine::new(self.config.clone(), last_on);

        if let Err(e) = accelerometer::configure(hw) {
            self.stats.bus_errors += 1;
            warn!("boot: accelerometer setup failed ({}), motion auto-off disabled until it answers", e);
        }

        let now = hw.now_ms();
        self.button.reset(now);
        self.housekeeping.reset(now);
        self.machine.start(now);
        self.apply_output(hw);

        sink.emit(&AppEvent::Started {
            preset: self.config.preset,
            last_on,
        });
    }

    /// One pass of the loop body.
    pub fn tick<B: Board>(&mut self, hw: &mut B, sink: &mut impl EventSink) -> TickOutcome {
        if self.powered_down {
            return TickOutcome::PoweredDown;
        }
        self.stats.polls += 1;

        // 1–2. Button and transition table.
        let now = hw.now_ms();
        let edge = self.button.sample(hw, now);
        if let Some(t) = self.machine.evaluate(now, self.button.state(), edge) {
            self.report(t, sink);
        }

        // 3. Motion interrupt.
        let now = hw.now_ms();
        match self.motion.poll(hw, now, &mut self.machine) {
            Ok(Some(ev)) => {
                self.stats.motion_events += 1;
                sink.emit(&AppEvent::Motion {
                    tap: ev.tilt.tap,
                    shake: ev.tilt.shake,
                    axes: ev.axes,
                });
            }
            Ok(None) => {}
            Err(e) => {
                self.stats.bus_errors += 1;
                warn!("motion: tilt read failed: {}", e);
            }
        }

        // 4. Once-per-second housekeeping.
        if self.housekeeping.ready(now) {
            self.housekeeping_pass(hw, sink);
        }

        // 5. Driver lines.
        let now = hw.now_ms();
        self.machine.refresh_blink(now);
        self.apply_output(hw);

        // 6. Charge indicator.
        let raw = hw.read_analog(AnalogChannel::Charge);
        let level = self.charge.led_level(raw, now);
        self.status_led.set(hw, level);

        // 7. Pending power-off.
        match self.machine.pending_power_off_ms() {
            Some(at) if now >= at => self.power_down(hw, sink),
            _ => TickOutcome::Running,
        }
    }

    pub fn machine(&self) -> &ModeStateMachine {
        &self.machine
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    // ── Internal ──────────────────────────────────────────────────

    fn housekeeping_pass<B: Board>(&mut self, hw: &mut B, sink: &mut impl EventSink) {
        // Driving the pin against a closed switch would short it.
        if !self.button.state().pressed {
            hw.reseat_button();
        }

        let check = self.thermal.check(hw, &mut self.machine);
        self.stats.record_temperature(check.reading.celsius);
        sink.emit(&AppEvent::TemperatureSample {
            celsius: check.reading.celsius,
            raw: check.reading.raw,
        });
        if check.tripped {
            self.stats.thermal_trips += 1;
            // The flash sequence wrote the lines directly and blocked the
            // loop; hold steady low for a full interval before re-checking.
            self.applied = None;
            self.housekeeping.reset(hw.now_ms());
            sink.emit(&AppEvent::ThermalTrip {
                celsius: check.reading.celsius,
            });
        }
        if let Some(t) = check.transition {
            self.report(t, sink);
        }

        let now = hw.now_ms();
        if let Some(t) = self.motion.check_shutoff(now, &mut self.machine) {
            self.stats.motion_shutoffs += 1;
            self.report(t, sink);
        }
    }

    fn apply_output<B: Board>(&mut self, hw: &mut B) {
        let output = self.machine.output();
        if self.applied != Some(output) {
            output.apply(hw);
            self.applied = Some(output);
        }
    }

    fn power_down<B: Board>(&mut self, hw: &mut B, sink: &mut impl EventSink) -> TickOutcome {
        let last_on = self.machine.last_on();
        let persisted = if self.config.durable_storage {
            match self.memory.persist(hw, last_on) {
                Ok(written) => written,
                Err(e) => {
                    warn!("power: could not save last-on: {}", e);
                    false
                }
            }
        } else {
            false
        };

        info!("power: releasing latch | {}", self.stats.summary());
        hw.write(OutputLine::PowerLatch, false);
        self.powered_down = true;
        sink.emit(&AppEvent::PowerOff { last_on, persisted });
        TickOutcome::PoweredDown
    }

    fn report(&mut self, t: Transition, sink: &mut impl EventSink) {
        self.stats.mode_changes += 1;
        sink.emit(&AppEvent::ModeChanged {
            from: t.from,
            to: t.to,
            cause: t.cause,
        });
    }
}
