//! Runtime diagnostics.
//!
//! Counters collected by the scheduler over one power-on session, plus a
//! short history of temperature samples.  Fixed capacity, no heap.  The
//! summary is logged when the power latch is released.

use core::fmt::Write;

use heapless::HistoryBuffer;

/// Temperature samples retained (one per housekeeping pass).
pub const TEMPERATURE_HISTORY: usize = 8;

#[derive(Debug, Default)]
pub struct RuntimeStats {
    pub polls: u64,
    pub mode_changes: u32,
    pub motion_events: u32,
    pub motion_shutoffs: u32,
    pub thermal_trips: u32,
    pub bus_errors: u32,
    temperatures: HistoryBuffer<f32, TEMPERATURE_HISTORY>,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_temperature(&mut self, celsius: f32) {
        self.temperatures.write(celsius);
    }

    /// Most recent sample.
    pub fn last_temperature(&self) -> Option<f32> {
        self.temperatures.recent().copied()
    }

    /// Highest retained sample.
    pub fn peak_temperature(&self) -> Option<f32> {
        self.temperatures
            .oldest_ordered()
            .copied()
            .reduce(f32::max)
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> heapless::String<128> {
        let mut s = heapless::String::new();
        let _ = write!(
            s,
            "polls={} modes={} motion={} auto_off={} thermal={} bus_err={}",
            self.polls,
            self.mode_changes,
            self.motion_events,
            self.motion_shutoffs,
            self.thermal_trips,
            self.bus_errors,
        );
        if let Some(peak) = self.peak_temperature() {
            let _ = write!(s, " peak={:.1}C", peak);
        }
        s
    }
}
