//! Motion-based auto shutoff.
//!
//! The accelerometer raises its interrupt line on tap or shake.  Each
//! poll the monitor checks the line; a classified event pushes the light's
//! inactivity deadline out by the configured window.  Once per second the
//! scheduler asks [`MotionMonitor::check_shutoff`] whether the deadline
//! has passed, in which case the light is forced off.

use log::{debug, info, warn};

use crate::app::ports::{AccelerometerBus, BusError, GpioPort, InputLine};
use crate::config::SystemConfig;
use crate::drivers::accelerometer::{self, Axes, TiltStatus};
use crate::fsm::{Mode, ModeStateMachine, Transition};

/// One accepted tap/shake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    pub tilt: TiltStatus,
    /// `None` if the axis read failed on the bus.
    pub axes: Option<Axes>,
}

pub struct MotionMonitor {
    report_interval_ms: Option<u32>,
    last_motion_ms: Option<u64>,
}

impl MotionMonitor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            report_interval_ms: config.motion_report_interval_ms,
            last_motion_ms: None,
        }
    }

    /// Time of the last accepted motion event.
    pub fn last_motion_ms(&self) -> Option<u64> {
        self.last_motion_ms
    }

    /// Check the interrupt line and, on tap/shake, restart the inactivity
    /// window.  A failed tilt read is returned to the caller; a failed
    /// axis read only drops the axes from the event.
    pub fn poll<H>(
        &mut self,
        hw: &mut H,
        now_ms: u64,
        sm: &mut ModeStateMachine,
    ) -> Result<Option<MotionEvent>, BusError>
    where
        H: GpioPort + AccelerometerBus,
    {
        if !hw.read(InputLine::AccelInterrupt) {
            return Ok(None);
        }

        let tilt = accelerometer::read_tilt(hw)?;
        if !tilt.any() {
            return Ok(None);
        }

        if let (Some(interval), Some(last)) = (self.report_interval_ms, self.last_motion_ms) {
            if now_ms.saturating_sub(last) < u64::from(interval) {
                debug!("motion: re-report within {} ms suppressed", interval);
                return Ok(None);
            }
        }

        self.last_motion_ms = Some(now_ms);
        sm.touch_motion(now_ms);

        let axes = match accelerometer::read_axes(hw) {
            Ok(axes) => Some(axes),
            Err(e) => {
                warn!("motion: axis read failed: {}", e);
                None
            }
        };

        Ok(Some(MotionEvent {
            tilt,
            axes,
        }))
    }

    /// Force the light off once the inactivity deadline has passed.
    pub fn check_shutoff(&self, now_ms: u64, sm: &mut ModeStateMachine) -> Option<Transition> {
        if sm.mode() == Mode::Off || now_ms <= sm.motion_deadline_ms() {
            return None;
        }
        info!(
            "motion: no activity since {} ms, switching off",
            sm.motion_deadline_ms()
                .saturating_sub(u64::from(sm.config().inactivity_window_ms))
        );
        sm.force_off(now_ms)
    }
}
