//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the four input pins and the relay board, exposing them through
//! [`InputPort`] and [`RelayPort`].  Generic over the `embedded-hal`
//! traits so the same adapter runs on `esp-idf-hal` pin drivers and on
//! host-side mocks.

use embedded_hal::digital::{InputPin, PinState};
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::{InputPort, InputSnapshot, RelayPort};
use crate::drivers::relay_board::RelayBoard;

/// The four physical inputs, in registration order.
pub struct InputPins<P> {
    pub gate_button: P,
    pub light_button: P,
    pub down_switch: P,
    pub up_switch: P,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, I2C> {
    inputs: InputPins<P>,
    relays: RelayBoard<I2C>,
}

impl<P: InputPin, I2C: I2c> HardwareAdapter<P, I2C> {
    pub fn new(inputs: InputPins<P>, relays: RelayBoard<I2C>) -> Self {
        Self { inputs, relays }
    }

    pub fn relay_board(&self) -> &RelayBoard<I2C> {
        &self.relays
    }

    /// Release every relay (boot and shutdown).
    pub fn all_off(&mut self) {
        if let Err(e) = self.relays.all_off() {
            warn!("Relay board: all-off failed: {:?}", e);
        }
    }
}

/// A pin that cannot be read counts as LOW (inputs are pulled down).
fn level(pin: &mut impl InputPin, name: &str) -> PinState {
    match pin.is_high() {
        Ok(high) => PinState::from(high),
        Err(e) => {
            warn!("GPIO read failed on {}: {:?}", name, e);
            PinState::Low
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<P: InputPin, I2C: I2c> InputPort for HardwareAdapter<P, I2C> {
    fn read_inputs(&mut self) -> InputSnapshot {
        InputSnapshot {
            gate_button: level(&mut self.inputs.gate_button, "gate button"),
            light_button: level(&mut self.inputs.light_button, "light button"),
            down_switch: level(&mut self.inputs.down_switch, "down switch"),
            up_switch: level(&mut self.inputs.up_switch, "up switch"),
        }
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<P: InputPin, I2C: I2c> RelayPort for HardwareAdapter<P, I2C> {
    fn turn_on_channel(&mut self, channel: u8) {
        if let Err(e) = self.relays.turn_on(channel) {
            warn!("Relay board: channel {} on failed: {:?}", channel, e);
        }
    }

    fn turn_off_channel(&mut self, channel: u8) {
        if let Err(e) = self.relays.turn_off(channel) {
            warn!("Relay board: channel {} off failed: {:?}", channel, e);
        }
    }
}
