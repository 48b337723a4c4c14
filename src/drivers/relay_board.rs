//! 4-channel I²C relay board driver.
//!
//! The board keeps one bitmask of energised relays in its control
//! register; every change rewrites the whole mask.  Channels are numbered
//! from 1 on the board and from 0 everywhere else in the firmware, the
//! conversion happens here and nowhere else.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::i2c::I2c`]: on ESP-IDF this is the
//! `esp-idf-hal` I²C driver, on host a recording mock.

use embedded_hal::i2c::I2c;

/// Control register holding the relay bitmask.
const CMD_CHANNEL_CTRL: u8 = 0x10;

/// Number of relays on the board.
pub const BOARD_CHANNELS: u8 = 4;

pub struct RelayBoard<I2C> {
    i2c: I2C,
    address: u8,
    /// Mirror of the board's control register.
    mask: u8,
}

impl<I2C: I2c> RelayBoard<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            mask: 0,
        }
    }

    /// Energise zero-based relay `channel`.
    pub fn turn_on(&mut self, channel: u8) -> Result<(), I2C::Error> {
        self.write_mask(self.mask | Self::bit(channel))
    }

    /// Release zero-based relay `channel`.
    pub fn turn_off(&mut self, channel: u8) -> Result<(), I2C::Error> {
        self.write_mask(self.mask & !Self::bit(channel))
    }

    /// Release every relay.
    pub fn all_off(&mut self) -> Result<(), I2C::Error> {
        self.write_mask(0)
    }

    /// Bitmask of energised relays, bit 0 = board channel 1.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    pub fn is_on(&self, channel: u8) -> bool {
        self.mask & Self::bit(channel) != 0
    }

    fn bit(channel: u8) -> u8 {
        if channel < BOARD_CHANNELS {
            1 << channel
        } else {
            0
        }
    }

    fn write_mask(&mut self, mask: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[CMD_CHANNEL_CTRL, mask])?;
        self.mask = mask;
        Ok(())
    }
}
