//! GPIO / peripheral pin assignments for the gate controller board.
//!
//! Single source of truth: `main` claims every pin by the numbers below
//! rather than hard-coding them.  All digital inputs are pulled down with
//! external resistors, so an idle input reads LOW.

// ---------------------------------------------------------------------------
// Push buttons (wall panel)
// ---------------------------------------------------------------------------

/// Momentary gate button.  HIGH while pressed.
pub const GATE_BUTTON_GPIO: i32 = 16;
/// Momentary light button.  HIGH while pressed.
pub const LIGHT_BUTTON_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Limit switches (gate end-of-travel)
// ---------------------------------------------------------------------------

/// Lower limit switch.  HIGH when the gate rests fully closed.
pub const GATE_DOWN_SWITCH_GPIO: i32 = 12;
/// Upper limit switch.  HIGH when the gate rests fully open.
pub const GATE_UP_SWITCH_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// I²C bus (4-channel relay board)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 7-bit address of the relay board (factory default).
pub const RELAY_BOARD_I2C_ADDR: u8 = 0x11;
/// I²C bus clock for the relay board.
pub const I2C_BAUDRATE_HZ: u32 = 100_000;

/// Every GPIO claimed at boot, in claim order.
pub const CLAIMED_GPIOS: [i32; 6] = [
    I2C_SDA_GPIO,
    I2C_SCL_GPIO,
    GATE_BUTTON_GPIO,
    LIGHT_BUTTON_GPIO,
    GATE_DOWN_SWITCH_GPIO,
    GATE_UP_SWITCH_GPIO,
];
