//! Application core: pure domain logic, zero I/O.
//!
//! Gate FSM orchestration, light and photo-bypass handling, and the
//! per-cycle tick driver.  All interaction with hardware and the
//! messaging link happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
