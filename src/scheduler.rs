//! Tick-paced relay scheduler.
//!
//! Logical relay requests (on, off, timed pulse) are latched into a
//! fixed array of channel records and turned into driver calls by
//! [`RelayScheduler::apply`], once per control cycle.  Nothing in here
//! blocks: a pulse is a countdown decremented by [`RelayScheduler::tick`]
//! that sets the channel's pending-off flag when it runs out.
//!
//! ```text
//!  request_on / request_off / request_pulse
//!                 │
//!                 ▼
//!   ┌───────────────────────────────┐   tick(elapsed)
//!   │ [RelayChannel; CHANNEL_COUNT] │◀──────────────── TickClock
//!   │  pending_on · pending_off ·   │
//!   │  countdown                    │
//!   └───────────────┬───────────────┘
//!                   │ apply()
//!                   ▼
//!             RelayPort (board driver)
//! ```

use crate::app::ports::RelayPort;
use log::{debug, warn};

/// Number of relay channels on the board.
pub const CHANNEL_COUNT: usize = 4;

/// Latched requests for one relay channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayChannel {
    pub pending_on: bool,
    pub pending_off: bool,
    /// Ticks until an armed pulse ends.  0 = no pulse running.
    pub countdown: u32,
}

/// The relay scheduler.  Sole owner of all channel flags and timers.
pub struct RelayScheduler {
    channels: [RelayChannel; CHANNEL_COUNT],
}

impl Default for RelayScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayScheduler {
    pub fn new() -> Self {
        Self {
            channels: [RelayChannel::default(); CHANNEL_COUNT],
        }
    }

    /// Switch `ch` on at the next [`apply`](Self::apply).
    pub fn request_on(&mut self, ch: usize) {
        if let Some(c) = self.slot(ch) {
            c.pending_on = true;
        }
    }

    /// Switch `ch` off at the next [`apply`](Self::apply).
    pub fn request_off(&mut self, ch: usize) {
        if let Some(c) = self.slot(ch) {
            c.pending_off = true;
        }
    }

    /// Switch `ch` on now and off again after `ticks` ticks.
    ///
    /// Re-arms (does not extend) a pulse already running on `ch`.
    pub fn request_pulse(&mut self, ch: usize, ticks: u32) {
        if let Some(c) = self.slot(ch) {
            c.pending_on = true;
            c.countdown = ticks.max(1);
        }
    }

    /// Advance every running pulse by `elapsed_ticks`.
    ///
    /// Negative or zero elapsed time (clock rollback, sub-tick cycle)
    /// leaves every countdown untouched.
    pub fn tick(&mut self, elapsed_ticks: i64) {
        if elapsed_ticks <= 0 {
            return;
        }
        let step = u32::try_from(elapsed_ticks).unwrap_or(u32::MAX);
        for (ch, c) in self.channels.iter_mut().enumerate() {
            if c.countdown == 0 {
                continue;
            }
            c.countdown = c.countdown.saturating_sub(step);
            if c.countdown == 0 {
                if c.pending_on {
                    // Off wins at apply, so this pulse never closes the relay.
                    warn!("Relay: channel {} pulse expired before it was applied", ch);
                } else {
                    debug!("Relay: channel {} pulse expired", ch);
                }
                c.pending_off = true;
            }
        }
    }

    /// Turn latched requests into driver calls and clear them.
    ///
    /// Off wins over a simultaneously pending on.
    pub fn apply(&mut self, driver: &mut impl RelayPort) {
        for (ch, c) in self.channels.iter_mut().enumerate() {
            if c.pending_off {
                debug!("Relay: channel {} off", ch);
                driver.turn_off_channel(ch as u8);
                c.pending_off = false;
                c.pending_on = false;
            } else if c.pending_on {
                debug!("Relay: channel {} on", ch);
                driver.turn_on_channel(ch as u8);
                c.pending_on = false;
            }
        }
    }

    /// Snapshot of one channel, `None` if out of range.
    pub fn channel(&self, ch: usize) -> Option<RelayChannel> {
        self.channels.get(ch).copied()
    }

    /// True if no request is pending and no pulse is running.
    pub fn is_idle(&self) -> bool {
        self.channels
            .iter()
            .all(|c| !c.pending_on && !c.pending_off && c.countdown == 0)
    }

    fn slot(&mut self, ch: usize) -> Option<&mut RelayChannel> {
        let slot = self.channels.get_mut(ch);
        if slot.is_none() {
            warn!("Relay: request for unknown channel {}", ch);
        }
        slot
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tick clock
// ═══════════════════════════════════════════════════════════════

/// Converts a monotonic millisecond clock into whole scheduler ticks.
///
/// Sub-tick remainders carry over to the next cycle.  If the clock
/// steps backwards the reference is reset and the cycle reports a
/// negative elapsed value, which [`RelayScheduler::tick`] ignores.
pub struct TickClock {
    tick_ms: u64,
    last_ms: Option<u64>,
}

impl TickClock {
    pub fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms: u64::from(tick_ms.max(1)),
            last_ms: None,
        }
    }

    /// Whole ticks elapsed since the previous call.  The first call
    /// only records the reference and returns 0.
    pub fn elapsed_ticks(&mut self, now_ms: u64) -> i64 {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return 0;
        };
        if now_ms < last {
            warn!("TickClock: clock stepped back {} ms", last - now_ms);
            self.last_ms = Some(now_ms);
            return -(((last - now_ms) / self.tick_ms) as i64);
        }
        let ticks = (now_ms - last) / self.tick_ms;
        self.last_ms = Some(last + ticks * self.tick_ms);
        ticks as i64
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
