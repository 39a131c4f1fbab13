//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { preset, last_on } => {
                info!("START | preset={} last_on={:?}", preset.name(), last_on);
            }
            AppEvent::ModeChanged { from, to, cause } => {
                info!("MODE  | {:?} -> {:?} ({:?})", from, to, cause);
            }
            AppEvent::TemperatureSample { celsius, raw } => {
                debug!("TEMP  | {:.1}\u{00b0}C (raw={})", celsius, raw);
            }
            AppEvent::ThermalTrip { celsius } => {
                warn!("THERM | {:.1}\u{00b0}C over limit, dropped to low", celsius);
            }
            AppEvent::Motion { tap, shake, axes } => match axes {
                Some(a) => info!("MOTN  | tap={} shake={} x={} y={} z={}", tap, shake, a.x, a.y, a.z),
                None => info!("MOTN  | tap={} shake={}", tap, shake),
            },
            AppEvent::PowerOff { last_on, persisted } => {
                info!("POWER | off, last_on={:?} saved={}", last_on, persisted);
            }
        }
    }
}
