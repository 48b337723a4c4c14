//! System configuration parameters
//!
//! All tunable parameters for the gate controller.  The firmware boots
//! with [`GateConfig::default()`]; the serde derives let test fixtures
//! and provisioning tools describe alternative setups as JSON.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scheduler::CHANNEL_COUNT;

/// Capacity of topic prefix / suffix strings.
pub const TOPIC_CAPACITY: usize = 32;

pub type TopicString = heapless::String<TOPIC_CAPACITY>;

/// Relay board channel assignment (zero-based board channel per role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMap {
    /// Obstruction-beam (photo cell) bypass.
    pub photo_bypass: usize,
    /// Motor stop input.
    pub stop: usize,
    /// Motor trigger input (momentary "button" of the gate drive).
    pub gate: usize,
    pub light: usize,
}

impl Default for RelayMap {
    fn default() -> Self {
        Self {
            photo_bypass: 0,
            stop: 1,
            gate: 2,
            light: 3,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    // --- Inputs ---
    /// Debounce window for the gate and light push buttons (milliseconds)
    pub button_debounce_ms: u32,
    /// Debounce window for the limit switches (milliseconds)
    pub switch_debounce_ms: u32,

    // --- Relays ---
    /// Length of one relay scheduler tick (milliseconds)
    pub tick_interval_ms: u32,
    /// Motor trigger pulse length, models a short press (milliseconds)
    pub gate_pulse_ms: u32,
    /// How long the photo cell stays bypassed after a gate command (milliseconds)
    pub photo_bypass_pulse_ms: u32,
    pub relays: RelayMap,

    // --- Messaging ---
    /// Prefix of every topic, normally the MQTT client id
    pub topic_prefix: TopicString,
    /// Inbound topic suffix that toggles the photo bypass
    pub bypass_suffix: TopicString,

    // --- Timing ---
    /// Idle delay between control cycles (milliseconds)
    pub loop_period_ms: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            // Inputs
            button_debounce_ms: 50,
            switch_debounce_ms: 250,

            // Relays
            tick_interval_ms: 10,
            gate_pulse_ms: 100,
            photo_bypass_pulse_ms: 3000,
            relays: RelayMap::default(),

            // Messaging
            topic_prefix: topic("gate-controller"),
            bypass_suffix: topic("/potobaypass"),

            // Timing
            loop_period_ms: 1,
        }
    }
}

impl GateConfig {
    /// Convert a duration to relay ticks, never less than one tick.
    pub fn ticks(&self, ms: u32) -> u32 {
        (ms / self.tick_interval_ms.max(1)).max(1)
    }

    pub fn gate_pulse_ticks(&self) -> u32 {
        self.ticks(self.gate_pulse_ms)
    }

    pub fn photo_bypass_pulse_ticks(&self) -> u32 {
        self.ticks(self.photo_bypass_pulse_ms)
    }

    /// Parse and validate a JSON configuration (provisioning fixtures).
    /// Missing fields are an error; there is no partial merge.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(json)
            .map_err(|_| Error::Config("malformed configuration JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.button_debounce_ms == 0 || self.switch_debounce_ms == 0 {
            return Err(Error::Config("debounce window must be non-zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick interval must be non-zero"));
        }
        if self.gate_pulse_ms == 0 || self.photo_bypass_pulse_ms == 0 {
            return Err(Error::Config("pulse duration must be non-zero"));
        }
        let channels = [
            self.relays.photo_bypass,
            self.relays.stop,
            self.relays.gate,
            self.relays.light,
        ];
        if channels.iter().any(|&ch| ch >= CHANNEL_COUNT) {
            return Err(Error::Config("relay channel out of range"));
        }
        for (i, a) in channels.iter().enumerate() {
            if channels[i + 1..].contains(a) {
                return Err(Error::Config("relay channel assigned twice"));
            }
        }
        if self.topic_prefix.is_empty() {
            return Err(Error::Config("topic prefix must not be empty"));
        }
        if !self.bypass_suffix.starts_with('/') {
            return Err(Error::Config("bypass suffix must start with '/'"));
        }
        Ok(())
    }
}

/// Build a topic string from a literal, truncating at capacity.
pub fn topic(s: &str) -> TopicString {
    let mut out = TopicString::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
