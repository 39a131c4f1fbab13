//! Function-pointer finite state machine for the light modes.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StateTable                                                │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐   │
//! │  │ Mode     │ on_enter  │ on_exit  │ on_update         │   │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤   │
//! │  │ Off      │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │   │
//! │  │ Low      │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ Medium   │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ High     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  │ Blinking │ fn(ctx)   │ -        │ fn(ctx)->Option<> │   │
//! │  └──────────┴───────────┴──────────┴───────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each poll the engine calls `on_update` for the **current** state with
//! the debounced button state and the edge observed this poll (if any).
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! state, stamps the entry time, then runs `on_enter` for the next.
//! All handlers receive `&mut ModeContext`, the single owned blackboard
//! holding timing, last-on memory, deadlines, and the output command.
//!
//! [`ModeStateMachine`] wraps engine + context and is the only owner of
//! the current mode; monitors request changes through
//! [`force_off`](ModeStateMachine::force_off) and
//! [`force_low`](ModeStateMachine::force_low).

pub mod context;
pub mod states;

use context::{ButtonEdge, ButtonState, ModeContext};
use log::info;

use crate::config::SystemConfig;
use crate::drivers::light::LightOutput;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Every light mode.  The transient blink preview is `Blinking` with the
/// context's `suppress_release` flag set.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Blinking = 4,
}

impl Mode {
    /// Total number of modes, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `Mode`.  Panics on out-of-range in
    /// debug builds; returns `Off` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            4 => Self::Blinking,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Off
            }
        }
    }

    /// The steady brightness this mode represents, if any.
    pub fn brightness(self) -> Option<Brightness> {
        match self {
            Self::Low => Some(Brightness::Low),
            Self::Medium => Some(Brightness::Medium),
            Self::High => Some(Brightness::High),
            Self::Off | Self::Blinking => None,
        }
    }
}

impl From<Brightness> for Mode {
    fn from(b: Brightness) -> Self {
        match b {
            Brightness::Low => Self::Low,
            Brightness::Medium => Self::Medium,
            Brightness::High => Self::High,
        }
    }
}

/// A steady lit level.  This is the type of the last-on memory, so it can
/// never hold `Off` or `Blinking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Brightness {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Brightness {
    /// Decode a persisted byte.  Anything outside `1..=3` is rejected.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Next step in the Low → Medium → High cycle.  `None` at the top.
    pub fn brighter(self) -> Option<Self> {
        match self {
            Self::Low => Some(Self::Medium),
            Self::Medium => Some(Self::High),
            Self::High => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each transition.
pub type StateActionFn = fn(&mut ModeContext);

/// Signature for the per-poll update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut ModeContext) -> Option<Mode>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array. No heap, no `dyn`.
pub struct StateDescriptor {
    pub id: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active mode.  The context is
/// owned by the caller and threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `update()`.
    pub fn start(&mut self, ctx: &mut ModeContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current mode's update handler and apply the transition it
    /// requests.  Returns `(from, to)` when the mode changed.
    pub fn update(&mut self, ctx: &mut ModeContext) -> Option<(Mode, Mode)> {
        let next = (self.table[self.current].on_update)(ctx)?;
        self.force_transition(next, ctx)
    }

    /// Force an immediate transition regardless of what `on_update`
    /// would return.  A request for the current mode is a no-op.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut ModeContext) -> Option<(Mode, Mode)> {
        if next as usize == self.current {
            return None;
        }
        let from = self.current_mode();
        self.transition(next, ctx);
        Some((from, next))
    }

    /// The current mode.
    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Mode, ctx: &mut ModeContext) {
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.stamp_entry();

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

// ---------------------------------------------------------------------------
// Mode state machine (engine + owned context)
// ---------------------------------------------------------------------------

/// What caused a mode change; carried into diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Button,
    MotionTimeout,
    Thermal,
}

/// A completed mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    pub cause: TransitionCause,
}

/// Sole owner of the light mode and everything the transition table reads.
pub struct ModeStateMachine {
    fsm: Fsm,
    ctx: ModeContext,
}

impl ModeStateMachine {
    pub fn new(config: SystemConfig, last_on: Brightness) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), Mode::Off),
            ctx: ModeContext::new(config, last_on),
        }
    }

    /// Enter the initial `Off` mode.  The boot does not count as a mode
    /// entry for the double-tap rule.
    pub fn start(&mut self, now_ms: u64) {
        self.ctx.now_ms = now_ms;
        self.ctx.button.last_edge_ms = now_ms;
        self.ctx.touch_motion();
        self.fsm.start(&mut self.ctx);
    }

    /// Evaluate the transition table against this poll's button sample.
    pub fn evaluate(
        &mut self,
        now_ms: u64,
        button: ButtonState,
        edge: Option<ButtonEdge>,
    ) -> Option<Transition> {
        self.ctx.now_ms = now_ms;
        self.ctx.button = button;
        self.ctx.edge = edge;
        let changed = self.fsm.update(&mut self.ctx);
        self.ctx.edge = None;
        changed.map(|(from, to)| Transition {
            from,
            to,
            cause: TransitionCause::Button,
        })
    }

    /// Monitor-requested shutoff.
    pub fn force_off(&mut self, now_ms: u64) -> Option<Transition> {
        self.force(now_ms, Mode::Off, TransitionCause::MotionTimeout)
    }

    /// Thermal resolution: the light ends up in `Low`.
    pub fn force_low(&mut self, now_ms: u64) -> Option<Transition> {
        self.force(now_ms, Mode::Low, TransitionCause::Thermal)
    }

    /// Recompute the square-wave output while blinking.
    pub fn refresh_blink(&mut self, now_ms: u64) {
        if self.fsm.current_mode() == Mode::Blinking {
            self.ctx.now_ms = now_ms;
            self.ctx.output = self.ctx.blink_output();
        }
    }

    /// Push the inactivity deadline out from `now_ms`.
    pub fn touch_motion(&mut self, now_ms: u64) {
        self.ctx.now_ms = now_ms;
        self.ctx.touch_motion();
    }

    pub fn mode(&self) -> Mode {
        self.fsm.current_mode()
    }

    pub fn last_on(&self) -> Brightness {
        self.ctx.last_on
    }

    /// `true` while blinking has been entered but the entering press has
    /// not yet been released.
    pub fn is_preview(&self) -> bool {
        self.fsm.current_mode() == Mode::Blinking && self.ctx.suppress_release
    }

    pub fn output(&self) -> LightOutput {
        self.ctx.output
    }

    pub fn motion_deadline_ms(&self) -> u64 {
        self.ctx.motion_deadline_ms
    }

    pub fn pending_power_off_ms(&self) -> Option<u64> {
        self.ctx.pending_power_off_ms
    }

    pub fn mode_entry_ms(&self) -> Option<u64> {
        self.ctx.mode_entry_ms
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    fn force(&mut self, now_ms: u64, mode: Mode, cause: TransitionCause) -> Option<Transition> {
        self.ctx.now_ms = now_ms;
        self.fsm
            .force_transition(mode, &mut self.ctx)
            .map(|(from, to)| Transition { from, to, cause })
    }
}
