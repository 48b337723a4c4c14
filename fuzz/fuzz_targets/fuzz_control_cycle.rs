//! Fuzz target: `AppService::tick`
//!
//! Each input byte is one control cycle: the low nibble holds the four
//! raw input levels, the high nibble the clock step (including steps
//! backwards).  The service must never panic and the relay driver must
//! only ever see board channels.
//!
//! cargo fuzz run fuzz_control_cycle

#![no_main]

use embedded_hal::digital::PinState;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::ports::{EventSink, InputPort, InputSnapshot, RelayPort};
use gatekeeper::app::service::AppService;
use gatekeeper::config::GateConfig;
use gatekeeper::scheduler::CHANNEL_COUNT;
use libfuzzer_sys::fuzz_target;

struct Rig {
    inputs: InputSnapshot,
}

impl InputPort for Rig {
    fn read_inputs(&mut self) -> InputSnapshot {
        self.inputs
    }
}

impl RelayPort for Rig {
    fn turn_on_channel(&mut self, channel: u8) {
        assert!((channel as usize) < CHANNEL_COUNT);
    }

    fn turn_off_channel(&mut self, channel: u8) {
        assert!((channel as usize) < CHANNEL_COUNT);
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(GateConfig::default());
    let mut rig = Rig {
        inputs: InputSnapshot::default(),
    };
    let mut now: u64 = 10_000;

    for &byte in data {
        let bit = |n: u8| PinState::from(byte & (1 << n) != 0);
        rig.inputs = InputSnapshot {
            gate_button: bit(0),
            light_button: bit(1),
            down_switch: bit(2),
            up_switch: bit(3),
        };
        // 0..=11 steps forward by that many 25 ms units, 12..=15 step back.
        let step = u64::from(byte >> 4);
        now = if step < 12 {
            now + step * 25
        } else {
            now.saturating_sub((step - 11) * 100)
        };
        app.tick(now, &mut rig, &mut Discard);
    }
});
