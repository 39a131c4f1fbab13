//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by plain `fn` pointers. No closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!          ┌──[tap]──▶ LAST-ON ──┐        (Low / Medium / High)
//!   OFF ───┤                     │
//!    ▲ │   └─[re-tap]─▶ LOW ─▶ MEDIUM ─▶ HIGH
//!    │ │                 │        │        │
//!    │ │         [dwell > off-timeout]     │
//!    │ │                 ▼        ▼        ▼
//!    │ └──[hold]──▶ BLINKING ────────────▶ OFF
//!    │                       [dwell > exit]
//!    └────────────[motion timeout]──────── any lit mode
//! ```

use super::context::{ButtonEdge, ModeContext};
use super::{Brightness, Mode, StateDescriptor};
use crate::drivers::light::LightOutput;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // 0: Off
        StateDescriptor {
            id: Mode::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: Some(off_exit),
            on_update: off_update,
        },
        // 1: Low
        StateDescriptor {
            id: Mode::Low,
            name: "Low",
            on_enter: Some(low_enter),
            on_exit: None,
            on_update: low_update,
        },
        // 2: Medium
        StateDescriptor {
            id: Mode::Medium,
            name: "Medium",
            on_enter: Some(medium_enter),
            on_exit: None,
            on_update: medium_update,
        },
        // 3: High
        StateDescriptor {
            id: Mode::High,
            name: "High",
            on_enter: Some(high_enter),
            on_exit: None,
            on_update: high_update,
        },
        // 4: Blinking
        StateDescriptor {
            id: Mode::Blinking,
            name: "Blinking",
            on_enter: Some(blinking_enter),
            on_exit: None,
            on_update: blinking_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut ModeContext) {
    ctx.output = LightOutput::OFF;
    if ctx.config.hard_power_off {
        let at = ctx.now_ms + u64::from(ctx.config.power_off_delay_ms);
        ctx.pending_power_off_ms = Some(at);
        info!("OFF: power latch release scheduled at {} ms", at);
    } else {
        info!("OFF: light dark");
    }
}

fn off_exit(ctx: &mut ModeContext) {
    if ctx.pending_power_off_ms.take().is_some() {
        debug!("OFF: pending power-off cancelled");
    }
}

fn off_update(ctx: &mut ModeContext) -> Option<Mode> {
    match ctx.edge {
        Some(ButtonEdge::Released { held_ms }) => {
            if ctx.take_suppressed_release() {
                debug!("OFF: swallowing release of the blink press");
                return None;
            }
            if held_ms < u64::from(ctx.config.short_press_floor_ms) {
                debug!("OFF: ignoring {} ms glitch", held_ms);
                return None;
            }
            let window = u64::from(ctx.config.double_tap_window_ms);
            match ctx.dwell_ms() {
                Some(dwell) if dwell <= window => Some(Mode::Low),
                _ => Some(Mode::from(ctx.last_on)),
            }
        }
        Some(ButtonEdge::Pressed) => None,
        None => {
            if ctx.suppress_release {
                return None;
            }
            if ctx.button.pressed && ctx.held_ms() > u64::from(ctx.config.long_press_ms) {
                return Some(Mode::Blinking);
            }
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  LOW / MEDIUM / HIGH: steady levels
// ═══════════════════════════════════════════════════════════════════════════

fn lit_enter(ctx: &mut ModeContext, level: Brightness) {
    ctx.output = LightOutput::for_brightness(level);
    ctx.last_on = level;
    info!("{:?}: duty={} high_range={}", level, ctx.output.duty, ctx.output.high_range);
}

fn low_enter(ctx: &mut ModeContext) {
    lit_enter(ctx, Brightness::Low);
}

fn medium_enter(ctx: &mut ModeContext) {
    lit_enter(ctx, Brightness::Medium);
}

fn high_enter(ctx: &mut ModeContext) {
    lit_enter(ctx, Brightness::High);
}

/// Shared release handling for the steady levels.  The top of the cycle
/// always powers off; lower levels step up unless the light has been on
/// long enough that the press means "off".
fn lit_update(ctx: &mut ModeContext, level: Brightness) -> Option<Mode> {
    let Some(ButtonEdge::Released { held_ms }) = ctx.edge else {
        return None;
    };
    if ctx.take_suppressed_release() {
        debug!("{:?}: swallowing release of the blink press", level);
        return None;
    }
    if held_ms <= u64::from(ctx.config.press_debounce_ms) {
        return None;
    }
    let Some(next) = level.brighter() else {
        return Some(Mode::Off);
    };
    let dwell = ctx.dwell_ms().unwrap_or(u64::MAX);
    if dwell > u64::from(ctx.config.off_timeout_ms) {
        Some(Mode::Off)
    } else {
        Some(Mode::from(next))
    }
}

fn low_update(ctx: &mut ModeContext) -> Option<Mode> {
    lit_update(ctx, Brightness::Low)
}

fn medium_update(ctx: &mut ModeContext) -> Option<Mode> {
    lit_update(ctx, Brightness::Medium)
}

fn high_update(ctx: &mut ModeContext) -> Option<Mode> {
    lit_update(ctx, Brightness::High)
}

// ═══════════════════════════════════════════════════════════════════════════
//  BLINKING: 600 ms square wave at the last-on level
// ═══════════════════════════════════════════════════════════════════════════

fn blinking_enter(ctx: &mut ModeContext) {
    // Entered from a long hold: the release of that same press must not
    // count as an exit request.
    ctx.suppress_release = ctx.button.pressed;
    ctx.output = ctx.blink_output();
    info!(
        "BLINKING: {:?} square wave{}",
        ctx.last_on,
        if ctx.suppress_release { " (preview)" } else { "" }
    );
}

fn blinking_update(ctx: &mut ModeContext) -> Option<Mode> {
    let Some(ButtonEdge::Released { held_ms }) = ctx.edge else {
        return None;
    };

    if ctx.take_suppressed_release() {
        ctx.stamp_entry();
        info!("BLINKING: confirmed");
        return None;
    }

    if held_ms <= u64::from(ctx.config.press_debounce_ms) {
        return None;
    }
    let dwell = ctx.dwell_ms().unwrap_or(u64::MAX);
    match ctx.config.blink_exit_ms {
        Some(exit) if dwell <= u64::from(exit) => None,
        _ => Some(Mode::Off),
    }
}
