//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, publish over MQTT).

use crate::fsm::GateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The gate state changed (carries the new state only).
    GateChanged(GateState),

    /// The light actually flipped.
    LightChanged(bool),

    /// Full state, re-sent whenever the messaging link comes online.
    Snapshot { gate: GateState, light: bool },

    /// The application service has started (carries initial state).
    Started(GateState),
}
