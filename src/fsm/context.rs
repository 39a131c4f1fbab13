//! Shared mutable context threaded through every FSM handler.
//!
//! `ModeContext` is the single struct that mode handlers read from and
//! write to: the debounced button sample, timing, last-on memory, the
//! motion and power-off deadlines, and the output command.  It replaces
//! what would otherwise be a pile of firmware globals.

use crate::config::SystemConfig;
use crate::drivers::light::LightOutput;

use super::Brightness;

// ---------------------------------------------------------------------------
// Button sample (written by the debouncer before each update)
// ---------------------------------------------------------------------------

/// Debounced button state.  Only changes on an observed level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    /// Time of the most recent observed edge.
    pub last_edge_ms: u64,
}

/// Edge observed during one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    /// The press lasted `held_ms`.
    Released { held_ms: u64 },
}

// ---------------------------------------------------------------------------
// ModeContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler.
pub struct ModeContext {
    // -- Timing --
    /// Time of the poll being evaluated.
    pub now_ms: u64,
    /// When the current mode was entered (or a blink preview confirmed).
    /// `None` until the first transition after boot.
    pub mode_entry_ms: Option<u64>,

    // -- Input --
    pub button: ButtonState,
    /// Edge seen this poll; cleared after the update handler runs.
    pub edge: Option<ButtonEdge>,

    // -- Memory --
    /// Brightness restored by a press from off.
    pub last_on: Brightness,
    /// Set while the press that entered blink mode is still held.  Survives
    /// a forced mode change; whichever mode sees the release consumes it.
    pub suppress_release: bool,

    // -- Deadlines --
    /// Light switches off once `now` passes this without motion.
    pub motion_deadline_ms: u64,
    /// Power latch release time (hard power-off variant, while off).
    pub pending_power_off_ms: Option<u64>,

    // -- Output --
    /// Command applied to the driver lines after each poll.
    pub output: LightOutput,

    // -- Configuration --
    pub config: SystemConfig,
}

impl ModeContext {
    pub fn new(config: SystemConfig, last_on: Brightness) -> Self {
        Self {
            now_ms: 0,
            mode_entry_ms: None,
            button: ButtonState {
                pressed: false,
                last_edge_ms: 0,
            },
            edge: None,
            last_on,
            suppress_release: false,
            motion_deadline_ms: 0,
            pending_power_off_ms: None,
            output: LightOutput::OFF,
            config,
        }
    }

    /// Time spent in the current mode.  `None` before the first
    /// transition, which the double-tap rule treats as "long ago".
    pub fn dwell_ms(&self) -> Option<u64> {
        self.mode_entry_ms
            .map(|entry| self.now_ms.saturating_sub(entry))
    }

    /// How long the button has been held (meaningful while pressed).
    pub fn held_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.button.last_edge_ms)
    }

    /// Record `now` as the mode entry time and restart the motion window.
    pub fn stamp_entry(&mut self) {
        self.mode_entry_ms = Some(self.now_ms);
        self.touch_motion();
    }

    /// Consume a pending swallow for this release edge.
    pub fn take_suppressed_release(&mut self) -> bool {
        std::mem::take(&mut self.suppress_release)
    }

    pub fn touch_motion(&mut self) {
        self.motion_deadline_ms = self.now_ms + u64::from(self.config.inactivity_window_ms);
    }

    /// Output for the current point of the blink square wave.
    pub fn blink_output(&self) -> LightOutput {
        let phase = self.now_ms % u64::from(self.config.blink_period_ms);
        if phase < u64::from(self.config.blink_on_ms) {
            LightOutput::for_brightness(self.last_on)
        } else {
            LightOutput::OFF
        }
    }
}
