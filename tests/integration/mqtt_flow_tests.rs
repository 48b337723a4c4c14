//! Integration tests for the messaging side: online handshake, state
//! publication, and inbound commands flowing through the queue into the
//! application core.

use embedded_hal::digital::PinState;

use gatekeeper::adapters::mqtt::{topic_suffix, InboundQueue, MqttEventSink};
use gatekeeper::app::commands::AppCommand;
use gatekeeper::app::service::AppService;
use gatekeeper::config::GateConfig;
use gatekeeper::fsm::GateState;

use super::mock_hw::{run, MockHardware, MockLink, VecSink};

fn make() -> (AppService, MqttEventSink<MockLink>, GateConfig) {
    let config = GateConfig::default();
    let sink = MqttEventSink::new(MockLink::default(), config.bypass_suffix.clone());
    (AppService::new(config.clone()), sink, config)
}

/// Drain `queue` into the app the way the firmware loop does.
fn drain(queue: &InboundQueue, app: &mut AppService, sink: &mut MqttEventSink<MockLink>) {
    while let Some(cmd) = queue.pop() {
        app.handle_command(cmd, sink);
    }
}

#[test]
fn coming_online_announces_status_subscriptions_and_state() {
    let (mut app, mut mqtt, _) = make();
    let mut hw = MockHardware::closed();

    // Offline: the gate settles but nothing is published.
    run(&mut app, &mut hw, &mut mqtt, 0, 300);
    assert_eq!(app.state(), GateState::Close);
    assert!(mqtt.link().published.is_empty());

    mqtt.link_mut().online = true;
    assert!(mqtt.poll_online());
    app.announce(&mut mqtt);

    let link = mqtt.link();
    assert_eq!(link.payloads("/status"), vec!["online"]);
    assert_eq!(link.payloads("/gate/state"), vec!["close"]);
    assert_eq!(link.payloads("/light/state"), vec!["off"]);
    assert!(link.published.iter().all(|(_, _, retain)| *retain));
    assert_eq!(
        link.subscribed,
        vec!["/gate/switch", "/light", "/potobaypass", "/restart"]
    );
}

#[test]
fn transitions_publish_while_online() {
    let (mut app, mut mqtt, _) = make();
    mqtt.link_mut().online = true;
    mqtt.poll_online();
    let mut hw = MockHardware::closed();
    let mut log = VecSink::new();

    run(&mut app, &mut hw, &mut (&mut log, &mut mqtt), 0, 260);
    hw.inputs.down_switch = PinState::Low;
    run(&mut app, &mut hw, &mut (&mut log, &mut mqtt), 270, 530);

    assert_eq!(mqtt.link().payloads("/gate/state"), vec!["close", "opening"]);
    assert_eq!(mqtt.link().payloads("/light/state"), vec!["on"]);
    // Both sinks saw the same events.
    assert_eq!(log.events.len(), 3);
}

#[test]
fn inbound_light_command_publishes_and_switches_relay() {
    let (mut app, mut mqtt, config) = make();
    mqtt.link_mut().online = true;
    mqtt.poll_online();
    let mut hw = MockHardware::new();
    let queue = InboundQueue::new();

    assert!(queue.push("/light", b"true", &config.bypass_suffix));
    drain(&queue, &mut app, &mut mqtt);
    assert!(app.light_on());
    assert_eq!(mqtt.link().payloads("/light/state"), vec!["on"]);

    run(&mut app, &mut hw, &mut mqtt, 0, 0);
    assert!(hw.is_on(3));

    // Anything but exactly "true" turns it off.
    assert!(queue.push("/light", b"TRUE", &config.bypass_suffix));
    drain(&queue, &mut app, &mut mqtt);
    run(&mut app, &mut hw, &mut mqtt, 10, 10);
    assert!(!hw.is_on(3));
    assert_eq!(mqtt.link().payloads("/light/state"), vec!["on", "off"]);
}

#[test]
fn inbound_gate_switch_matches_button_press() {
    let (mut app, mut mqtt, config) = make();
    let mut hw = MockHardware::closed();
    let queue = InboundQueue::new();
    run(&mut app, &mut hw, &mut mqtt, 0, 260);

    assert!(queue.push("/gate/switch", b"", &config.bypass_suffix));
    drain(&queue, &mut app, &mut mqtt);
    run(&mut app, &mut hw, &mut mqtt, 270, 270);
    assert!(hw.is_on(config.relays.gate));
    assert!(hw.is_on(config.relays.photo_bypass));
}

#[test]
fn long_payloads_keep_their_meaning() {
    let (mut app, mut mqtt, config) = make();
    let mut hw = MockHardware::closed();
    let queue = InboundQueue::new();
    run(&mut app, &mut hw, &mut mqtt, 0, 260);

    app.handle_command(AppCommand::SetLight(true), &mut mqtt);
    assert!(queue.push("/gate/switch", &[b'x'; 65], &config.bypass_suffix));
    assert!(queue.push("/light", &[b't'; 100], &config.bypass_suffix));
    drain(&queue, &mut app, &mut mqtt);
    assert!(!app.light_on());

    run(&mut app, &mut hw, &mut mqtt, 270, 270);
    assert!(hw.is_on(config.relays.gate));
    assert!(hw.is_on(config.relays.photo_bypass));
    assert!(!hw.is_on(config.relays.light));
}

#[test]
fn inbound_bypass_and_unknown_topics() {
    let (mut app, mut mqtt, config) = make();
    let mut hw = MockHardware::new();
    let queue = InboundQueue::new();

    assert!(!queue.push("/status", b"online", &config.bypass_suffix));
    assert!(queue.push("/potobaypass", b"true", &config.bypass_suffix));
    drain(&queue, &mut app, &mut mqtt);
    run(&mut app, &mut hw, &mut mqtt, 0, 0);

    assert!(app.photo_bypass_on());
    assert!(hw.is_on(config.relays.photo_bypass));
}

#[test]
fn full_topics_are_stripped_before_queueing() {
    let config = GateConfig::default();
    let queue = InboundQueue::new();

    let full = "gate-controller/light";
    let suffix = topic_suffix(full, &config.topic_prefix).unwrap();
    assert!(queue.push(suffix, b"true", &config.bypass_suffix));
    assert_eq!(queue.pop(), Some(AppCommand::SetLight(true)));

    assert_eq!(topic_suffix("other-device/light", &config.topic_prefix), None);
}

#[test]
fn reconnect_repeats_handshake() {
    let (app, mut mqtt, _) = make();
    mqtt.link_mut().online = true;
    assert!(mqtt.poll_online());
    app.announce(&mut mqtt);

    mqtt.link_mut().online = false;
    assert!(!mqtt.poll_online());
    mqtt.link_mut().online = true;
    assert!(mqtt.poll_online());
    app.announce(&mut mqtt);

    assert_eq!(mqtt.link().payloads("/status"), vec!["online", "online"]);
    assert_eq!(mqtt.link().payloads("/gate/state"), vec!["unknown", "unknown"]);
    assert_eq!(mqtt.link().subscribed.len(), 8);
}
