//! Polled, debounced push-button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up; the GPIO port reports
//! `true` while pressed.
//!
//! ## Debounce
//!
//! Every observed level change is accepted immediately as an edge, the
//! edge time is recorded, and the poll loop then blocks for the settle
//! delay (50 ms) so contact bounce is never sampled.  Release edges carry
//! the hold duration measured from the previous edge.

use crate::app::ports::{ClockPort, GpioPort, InputLine};
use crate::fsm::context::{ButtonEdge, ButtonState};

pub struct ButtonDebouncer {
    state: ButtonState,
    settle_ms: u32,
}

impl ButtonDebouncer {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            state: ButtonState {
                pressed: false,
                last_edge_ms: 0,
            },
            settle_ms,
        }
    }

    /// Anchor the edge clock at boot.
    pub fn reset(&mut self, now_ms: u64) {
        self.state.last_edge_ms = now_ms;
    }

    /// Sample the line once.  Returns the edge observed, if any; on an
    /// edge the call blocks for the settle delay before returning.
    pub fn sample<H>(&mut self, hw: &mut H, now_ms: u64) -> Option<ButtonEdge>
    where
        H: GpioPort + ClockPort,
    {
        let level = hw.read(InputLine::Button);
        if level == self.state.pressed {
            return None;
        }

        let since_edge = now_ms.saturating_sub(self.state.last_edge_ms);
        self.state = ButtonState {
            pressed: level,
            last_edge_ms: now_ms,
        };
        hw.pause_ms(self.settle_ms);

        Some(if level {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released {
                held_ms: since_edge,
            }
        })
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }
}
