//! Fuzz target: inbound MQTT message path
//!
//! Splits arbitrary bytes into a topic and a payload, strips the device
//! prefix and queues the decoded command.  Must never panic, every
//! subscribed topic must be accepted whatever its payload length, and
//! every queued command must come from the topic it names.
//!
//! cargo fuzz run fuzz_inbound_message

#![no_main]

use gatekeeper::adapters::mqtt::{topic_suffix, InboundQueue};
use gatekeeper::app::commands::AppCommand;
use gatekeeper::config::GateConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (topic, payload) = rest.split_at((split as usize).min(rest.len()));
    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };

    let config = GateConfig::default();
    let Some(suffix) = topic_suffix(topic, &config.topic_prefix) else {
        return;
    };

    let queue = InboundQueue::new();
    let known = [
        "/gate/switch",
        "/light",
        config.bypass_suffix.as_str(),
        "/restart",
    ];
    let pushed = queue.push(suffix, payload, &config.bypass_suffix);
    assert_eq!(pushed, known.contains(&suffix));
    if !pushed {
        return;
    }
    match queue.pop().expect("pushed command must pop") {
        AppCommand::GateSwitch => assert_eq!(suffix, "/gate/switch"),
        AppCommand::SetLight(on) => assert_eq!(on, payload == b"true"),
        AppCommand::SetBypass(on) => assert_eq!(on, payload == b"true"),
        AppCommand::Restart => assert_eq!(suffix, "/restart"),
    }
});
