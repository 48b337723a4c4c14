//! Input debouncing and the relay board driver.

pub mod debounce;
pub mod relay_board;
