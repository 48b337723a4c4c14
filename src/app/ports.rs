//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (GPIO inputs, relay board, event sinks, messaging link)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use embedded_hal::digital::PinState;

use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw levels of every physical input, sampled once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    pub gate_button: PinState,
    pub light_button: PinState,
    pub down_switch: PinState,
    pub up_switch: PinState,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            gate_button: PinState::Low,
            light_button: PinState::Low,
            down_switch: PinState::Low,
            up_switch: PinState::Low,
        }
    }
}

/// Read-side port: the domain calls this to sample the inputs.
pub trait InputPort {
    fn read_inputs(&mut self) -> InputSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay board.  Calls are synchronous and
/// treated as always succeeding; adapters log their own failures.
pub trait RelayPort {
    /// Energise the zero-based relay `channel`.
    fn turn_on_channel(&mut self, channel: u8);

    /// Release the zero-based relay `channel`.
    fn turn_off_channel(&mut self, channel: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / messaging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &super::events::AppEvent) {
        (**self).emit(event);
    }
}

/// Fan one event out to two sinks, in order.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Messaging port (publish/subscribe collaborator)
// ───────────────────────────────────────────────────────────────

/// The publish/subscribe link.  Topics are passed as suffixes; the
/// implementation owns the device prefix and the transport.
pub trait MessagingPort {
    /// Connectivity status signal.  Outbound traffic is skipped while offline.
    fn is_online(&self) -> bool;

    fn publish(&mut self, topic_suffix: &str, payload: &[u8], retain: bool)
    -> Result<(), CommsError>;

    fn subscribe(&mut self, topic_suffix: &str) -> Result<(), CommsError>;
}
