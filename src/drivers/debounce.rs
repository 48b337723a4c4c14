//! Polled debouncer for one digital input.
//!
//! ## Filtering
//!
//! Every raw flicker restarts the debounce window.  Once the raw level
//! has held still for longer than the window, it becomes the *stable*
//! level, and the trigger mode decides whether that stable transition
//! fires the edge handler:
//!
//! | Trigger   | Fires when                      |
//! |-----------|---------------------------------|
//! | `Rising`  | stable LOW → settled HIGH       |
//! | `Falling` | stable HIGH → settled LOW       |
//! | `Both`    | any change of the stable level  |
//!
//! `Both` inputs start from an "unknown" stable level, so the first
//! settled reading after boot always fires once.
//!
//! ## Edge handlers
//!
//! Handlers are plain `fn` pointers that receive the caller's context
//! (`&mut C`) and the settled level.  They run inline inside
//! [`DebouncedInput::sample`] and must only latch in-memory state.

use embedded_hal::digital::PinState;
use log::debug;

/// Which stable transitions fire the edge handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Rising,
    Falling,
    Both,
}

impl Trigger {
    /// The level a single-edge trigger waits for.  `None` for `Both`.
    fn target(self) -> Option<PinState> {
        match self {
            Self::Rising => Some(PinState::High),
            Self::Falling => Some(PinState::Low),
            Self::Both => None,
        }
    }
}

/// Signature of the per-input edge handler.
pub type EdgeHandler<C> = fn(&mut C, PinState);

pub struct DebouncedInput<C> {
    gpio: i32,
    trigger: Trigger,
    window_ms: u64,
    /// Last raw sample; doubles as the settling candidate.
    /// `None` only before the first sample of a `Both` input.
    candidate: Option<PinState>,
    last_change_ms: u64,
    /// Last settled level.  `None` = unknown (`Both` before first settle).
    stable: Option<PinState>,
    on_edge: EdgeHandler<C>,
}

impl<C> DebouncedInput<C> {
    pub fn new(gpio: i32, trigger: Trigger, window_ms: u32, on_edge: EdgeHandler<C>) -> Self {
        // Single-edge inputs start at the opposite level so the first
        // qualifying transition fires exactly once.
        let seed = trigger.target().map(|t| !t);
        Self {
            gpio,
            trigger,
            window_ms: u64::from(window_ms),
            candidate: seed,
            last_change_ms: 0,
            stable: seed,
            on_edge,
        }
    }

    /// Last settled level, `None` until a `Both` input first settles.
    pub fn stable(&self) -> Option<PinState> {
        self.stable
    }

    /// Feed one raw sample taken at `now_ms` (monotonic milliseconds).
    ///
    /// Returns `true` if the edge handler fired.  A clock that steps
    /// backwards never settles a candidate early.
    pub fn sample(&mut self, raw: PinState, now_ms: u64, ctx: &mut C) -> bool {
        if self.candidate != Some(raw) {
            self.candidate = Some(raw);
            self.last_change_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_change_ms) <= self.window_ms {
            return false;
        }

        let settled = raw;
        let fire = match self.trigger.target() {
            None => self.stable != Some(settled),
            Some(target) => self.stable == Some(!target) && settled == target,
        };
        if fire {
            debug!("GPIO {}: settled {:?}", self.gpio, settled);
            (self.on_edge)(ctx, settled);
        }
        self.stable = Some(settled);
        fire
    }
}
