//! Gate finite state machine.
//!
//! The gate drive is a "one button" motor controller: every press of its
//! trigger input advances it through open → stop → close.  The firmware
//! cannot observe the motor directly, so it tracks the gate from two
//! sources:
//!
//! - **Command edges** (wall button, `/gate/switch` message): the
//!   firmware pulses the trigger relay and advances its own model.
//! - **Switch edges**: the pair of debounced limit-switch levels
//!   `(down, up)` decides end positions and departures:
//!
//! ```text
//! ┌──────┬──────┬───────────────┬───────────┬───────┐
//! │ down │ up   │ precondition  │ new state │ light │
//! ├──────┼──────┼───────────────┼───────────┼───────┤
//! │ HIGH │ HIGH │ any           │ Error     │  —    │
//! │ LOW  │ LOW  │ Close         │ Opening   │  on   │
//! │ LOW  │ LOW  │ Open          │ Closing   │  off  │
//! │ LOW  │ HIGH │ any           │ Open      │  on   │
//! │ HIGH │ LOW  │ any           │ Close     │  off  │
//! │ LOW  │ LOW  │ otherwise     │  —        │  —    │
//! └──────┴──────┴───────────────┴───────────┴───────┘
//! ```
//!
//! `Error` has no timeout; it is left only when a later switch reading
//! matches a different row.

pub mod context;

use core::fmt;

use embedded_hal::digital::PinState;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GateState {
    Unknown = 0,
    Error = 1,
    Open = 2,
    Close = 3,
    Stop = 4,
    Opening = 5,
    Closing = 6,
}

impl GateState {
    /// Wire name, as published on the gate state topic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Error => "error",
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Transition functions
// ---------------------------------------------------------------------------

/// State after a command edge.  Only moving/stopped states react; the
/// end positions are left to the limit switches.
pub fn command_transition(current: GateState) -> GateState {
    match current {
        GateState::Opening => GateState::Stop,
        GateState::Stop => GateState::Closing,
        GateState::Closing => GateState::Opening,
        GateState::Unknown | GateState::Error | GateState::Open | GateState::Close => current,
    }
}

/// State and light request after a limit-switch reading.
pub fn switch_transition(
    current: GateState,
    down: PinState,
    up: PinState,
) -> (GateState, Option<bool>) {
    use PinState::{High, Low};
    match (down, up) {
        (High, High) => (GateState::Error, None),
        (Low, High) => (GateState::Open, Some(true)),
        (High, Low) => (GateState::Close, Some(false)),
        (Low, Low) => match current {
            GateState::Close => (GateState::Opening, Some(true)),
            GateState::Open => (GateState::Closing, Some(false)),
            _ => (current, None),
        },
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Outcome of a switch edge, for the caller to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// New state, `None` if the state did not change.
    pub changed_to: Option<GateState>,
    /// Light level the row asks for, if any.
    pub light: Option<bool>,
}

/// Holds the current gate state; mutated only through the transitions.
pub struct GateController {
    state: GateState,
}

impl Default for GateController {
    fn default() -> Self {
        Self::new()
    }
}

impl GateController {
    pub fn new() -> Self {
        Self {
            state: GateState::Unknown,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Apply a command edge.  Returns the new state if it changed.
    pub fn on_command_edge(&mut self) -> Option<GateState> {
        self.set(command_transition(self.state))
    }

    /// Apply a limit-switch reading.
    pub fn on_switch_edge(&mut self, down: PinState, up: PinState) -> SwitchOutcome {
        let (next, light) = switch_transition(self.state, down, up);
        SwitchOutcome {
            changed_to: self.set(next),
            light,
        }
    }

    fn set(&mut self, next: GateState) -> Option<GateState> {
        if next == self.state {
            return None;
        }
        info!("GATE | {} -> {}", self.state, next);
        self.state = next;
        Some(next)
    }
}
