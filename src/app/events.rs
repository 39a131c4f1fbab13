//! Outbound application events.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; in production they become log lines.

use crate::config::Preset;
use crate::drivers::accelerometer::Axes;
use crate::fsm::{Brightness, Mode, TransitionCause};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot finished; carries the restored last-on level.
    Started { preset: Preset, last_on: Brightness },

    /// The light changed mode.
    ModeChanged {
        from: Mode,
        to: Mode,
        cause: TransitionCause,
    },

    /// Housekeeping temperature sample.
    TemperatureSample { celsius: f32, raw: u16 },

    /// The protective flash sequence ran.
    ThermalTrip { celsius: f32 },

    /// Tap or shake accepted.
    Motion {
        tap: bool,
        shake: bool,
        axes: Option<Axes>,
    },

    /// The power latch was released.
    PowerOff { last_on: Brightness, persisted: bool },
}
