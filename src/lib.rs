//! Gatekeeper firmware library.
//!
//! A gate and light relay controller: debounced buttons and limit
//! switches feed a gate state machine, and a tick-driven scheduler times
//! the relay pulses.  State is published over MQTT, commands arrive the
//! same way.
//!
//! Everything outside `main.rs` builds on the host for testing.  ESP-IDF
//! specific code is guarded by
//! `#[cfg(all(target_os = "espidf", feature = "espidf"))]` within each
//! module, so the target and the optional ESP-IDF crates always agree.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod scheduler;

pub use error::{CommsError, Error, Result};
