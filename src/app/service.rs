//! Application service: the hexagonal core and per-cycle tick driver.
//!
//! [`AppService`] owns the debounced inputs, the gate controller, the
//! light/bypass flags and the relay scheduler.  One call to
//! [`AppService::tick`] is one control cycle:
//!
//! ```text
//!  InputPort ──▶ 1. sample inputs (edge handlers latch into GateContext)
//!                2. gate button → light button → limit-switch pair
//!                3. RelayScheduler::tick(elapsed)
//!  RelayPort ◀── 4. RelayScheduler::apply
//!                          │
//!                          └──▶ EventSink (gate / light notifications)
//! ```
//!
//! Nothing here blocks, and nothing re-enters sampling or scheduling
//! from inside a cycle.

use embedded_hal::digital::PinState;
use log::{info, warn};

use crate::config::GateConfig;
use crate::drivers::debounce::{DebouncedInput, Trigger};
use crate::fsm::context::{self, GateContext};
use crate::fsm::{GateController, GateState};
use crate::pins;
use crate::scheduler::{RelayScheduler, TickClock};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{EventSink, InputPort, RelayPort};

/// Gate button, light button, down switch, up switch (registration order).
const INPUT_COUNT: usize = 4;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: GateConfig,
    inputs: [DebouncedInput<GateContext>; INPUT_COUNT],
    ctx: GateContext,
    gate: GateController,
    relays: RelayScheduler,
    clock: TickClock,
    light_on: bool,
    photo_bypass_on: bool,
}

impl AppService {
    /// Construct the service and bind every input to its edge handler.
    pub fn new(config: GateConfig) -> Self {
        let inputs = [
            DebouncedInput::new(
                pins::GATE_BUTTON_GPIO,
                Trigger::Rising,
                config.button_debounce_ms,
                context::on_gate_button,
            ),
            DebouncedInput::new(
                pins::LIGHT_BUTTON_GPIO,
                Trigger::Rising,
                config.button_debounce_ms,
                context::on_light_button,
            ),
            DebouncedInput::new(
                pins::GATE_DOWN_SWITCH_GPIO,
                Trigger::Both,
                config.switch_debounce_ms,
                context::on_down_switch,
            ),
            DebouncedInput::new(
                pins::GATE_UP_SWITCH_GPIO,
                Trigger::Both,
                config.switch_debounce_ms,
                context::on_up_switch,
            ),
        ];
        let clock = TickClock::new(config.tick_interval_ms);

        Self {
            config,
            inputs,
            ctx: GateContext::new(),
            gate: GateController::new(),
            relays: RelayScheduler::new(),
            clock,
            light_on: false,
            photo_bypass_on: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.gate.state()));
        info!("AppService started in {}", self.gate.state());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle at monotonic time `now_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`RelayPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl InputPort + RelayPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Sample inputs
        let raw = hw.read_inputs();
        let levels = [
            raw.gate_button,
            raw.light_button,
            raw.down_switch,
            raw.up_switch,
        ];
        for (input, level) in self.inputs.iter_mut().zip(levels) {
            input.sample(level, now_ms, &mut self.ctx);
        }

        // 2. Edge-driven logic, in registration order
        if self.ctx.take_gate_press() {
            info!("Gate button pressed");
            self.gate_command(sink);
        }
        if self.ctx.take_light_press() {
            info!("Light button pressed");
            self.set_light(!self.light_on, sink);
        }
        if let Some((down, up)) = self.ctx.take_switch_pair() {
            self.switch_edge(down, up, sink);
        }

        // 3. Relay timers
        let elapsed = self.clock.elapsed_ticks(now_ms);
        self.relays.tick(elapsed);

        // 4. Relay actuation
        self.relays.apply(hw);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a command decoded from the messaging link.  Relay
    /// requests land at the next cycle's apply step.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::GateSwitch => self.gate_command(sink),
            AppCommand::SetLight(on) => self.set_light(on, sink),
            AppCommand::SetBypass(on) => self.set_photo_bypass(on),
            AppCommand::Restart => {
                warn!("Restart must be handled by the entry point; ignored");
            }
        }
    }

    /// Re-send the full state (used when the messaging link comes online).
    pub fn announce(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Snapshot {
            gate: self.gate.state(),
            light: self.light_on,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn photo_bypass_on(&self) -> bool {
        self.photo_bypass_on
    }

    /// Read-only view of the relay scheduler.
    pub fn relays(&self) -> &RelayScheduler {
        &self.relays
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Command edge: press the drive's trigger, bypass the photo cell
    /// for the first seconds of travel, advance the model.
    fn gate_command(&mut self, sink: &mut impl EventSink) {
        let relays = self.config.relays;
        self.relays
            .request_pulse(relays.gate, self.config.gate_pulse_ticks());
        if !self.photo_bypass_on {
            self.relays
                .request_pulse(relays.photo_bypass, self.config.photo_bypass_pulse_ticks());
        }
        if let Some(next) = self.gate.on_command_edge() {
            sink.emit(&AppEvent::GateChanged(next));
        }
    }

    fn switch_edge(&mut self, down: PinState, up: PinState, sink: &mut impl EventSink) {
        let outcome = self.gate.on_switch_edge(down, up);
        if let Some(light) = outcome.light {
            self.set_light(light, sink);
        }
        if let Some(next) = outcome.changed_to {
            sink.emit(&AppEvent::GateChanged(next));
        }
    }

    /// The light relay always follows the flag; a notification goes out
    /// only when the flag flips.
    fn set_light(&mut self, on: bool, sink: &mut impl EventSink) {
        let flipped = self.light_on != on;
        self.light_on = on;
        if on {
            self.relays.request_on(self.config.relays.light);
        } else {
            self.relays.request_off(self.config.relays.light);
        }
        if flipped {
            sink.emit(&AppEvent::LightChanged(on));
        }
    }

    fn set_photo_bypass(&mut self, on: bool) {
        info!("Photo bypass {}", if on { "on" } else { "off" });
        self.photo_bypass_on = on;
        if on {
            self.relays.request_on(self.config.relays.photo_bypass);
        } else {
            self.relays.request_off(self.config.relays.photo_bypass);
        }
    }
}
