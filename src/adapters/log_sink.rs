//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::GateChanged(state) => {
                info!("STATE | gate={}", state);
            }
            AppEvent::LightChanged(on) => {
                info!("LIGHT | {}", if *on { "on" } else { "off" });
            }
            AppEvent::Snapshot { gate, light } => {
                info!(
                    "SNAPSHOT | gate={} light={}",
                    gate,
                    if *light { "on" } else { "off" }
                );
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
        }
    }
}
