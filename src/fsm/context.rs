//! Edge latches written by the debounced-input handlers.
//!
//! The handlers run while inputs are being sampled, so they only record
//! what happened.  The control cycle consumes the latches afterwards in
//! a fixed order, which keeps sampling and gate logic strictly apart and
//! lets both limit switches settle before their pair is evaluated.

use embedded_hal::digital::PinState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GateContext {
    /// Gate button produced a press since the last cycle.
    pub gate_pressed: bool,
    /// Light button produced a press since the last cycle.
    pub light_pressed: bool,
    /// Last settled level of the lower limit switch.
    pub down_switch: Option<PinState>,
    /// Last settled level of the upper limit switch.
    pub up_switch: Option<PinState>,
    /// Either limit switch settled on a new level since the last cycle.
    pub switches_changed: bool,
}

impl GateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_gate_press(&mut self) -> bool {
        core::mem::take(&mut self.gate_pressed)
    }

    pub fn take_light_press(&mut self) -> bool {
        core::mem::take(&mut self.light_pressed)
    }

    /// The current `(down, up)` pair if a switch changed and both levels
    /// are known.  A pair with an unknown side stays latched.
    pub fn take_switch_pair(&mut self) -> Option<(PinState, PinState)> {
        if !self.switches_changed {
            return None;
        }
        let pair = self.down_switch.zip(self.up_switch)?;
        self.switches_changed = false;
        Some(pair)
    }
}

// ---------------------------------------------------------------------------
// Edge handlers (bound to the debounced inputs at startup)
// ---------------------------------------------------------------------------

pub fn on_gate_button(ctx: &mut GateContext, _level: PinState) {
    ctx.gate_pressed = true;
}

pub fn on_light_button(ctx: &mut GateContext, _level: PinState) {
    ctx.light_pressed = true;
}

pub fn on_down_switch(ctx: &mut GateContext, level: PinState) {
    ctx.down_switch = Some(level);
    ctx.switches_changed = true;
}

pub fn on_up_switch(ctx: &mut GateContext, level: PinState) {
    ctx.up_switch = Some(level);
    ctx.switches_changed = true;
}
