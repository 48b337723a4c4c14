//! Integration tests for the inputs → gate FSM → relay scheduler pipeline.
//!
//! Time is simulated: every cycle advances the clock by 10 ms, so with
//! the default configuration a button settles 60 ms after it changes
//! and a limit switch 260 ms after.

use embedded_hal::digital::PinState;

use gatekeeper::app::commands::AppCommand;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::service::AppService;
use gatekeeper::config::GateConfig;
use gatekeeper::fsm::GateState;

use super::mock_hw::{run, MockHardware, RelayCall, VecSink};

const BYPASS: usize = 0;
const GATE: usize = 2;
const LIGHT: usize = 3;

fn make_app() -> (AppService, VecSink) {
    let mut app = AppService::new(GateConfig::default());
    let mut sink = VecSink::new();
    app.start(&mut sink);
    sink.take();
    (app, sink)
}

/// Boot with the gate closed; returns at t = 260 ms with the state known.
fn boot_closed() -> (AppService, MockHardware, VecSink) {
    let (mut app, mut sink) = make_app();
    let mut hw = MockHardware::closed();
    run(&mut app, &mut hw, &mut sink, 0, 260);
    (app, hw, sink)
}

#[test]
fn start_reports_unknown() {
    let mut app = AppService::new(GateConfig::default());
    let mut sink = VecSink::new();
    app.start(&mut sink);
    assert_eq!(sink.events, vec![AppEvent::Started(GateState::Unknown)]);
}

#[test]
fn state_stays_unknown_until_switches_settle() {
    let (mut app, mut sink) = make_app();
    let mut hw = MockHardware::closed();

    run(&mut app, &mut hw, &mut sink, 0, 250);
    assert_eq!(app.state(), GateState::Unknown);
    assert!(sink.events.is_empty());

    run(&mut app, &mut hw, &mut sink, 260, 260);
    assert_eq!(app.state(), GateState::Close);
    assert_eq!(sink.take(), vec![AppEvent::GateChanged(GateState::Close)]);
    // Closed row asks for light off: no flip, but the relay is re-synced.
    assert_eq!(hw.calls, vec![RelayCall::Off(LIGHT as u8)]);
}

#[test]
fn both_switches_open_at_boot_keeps_unknown() {
    let (mut app, mut sink) = make_app();
    let mut hw = MockHardware::new();
    run(&mut app, &mut hw, &mut sink, 0, 1000);
    assert_eq!(app.state(), GateState::Unknown);
    assert!(sink.events.is_empty());
}

#[test]
fn gate_button_pulses_trigger_and_bypass() {
    let (mut app, mut hw, mut sink) = boot_closed();
    run(&mut app, &mut hw, &mut sink, 270, 390);
    let mark = hw.mark();

    hw.inputs.gate_button = PinState::High;
    run(&mut app, &mut hw, &mut sink, 400, 450);
    assert_eq!(hw.mark(), mark);

    run(&mut app, &mut hw, &mut sink, 460, 460);
    assert_eq!(
        hw.calls_since(mark),
        &[RelayCall::On(BYPASS as u8), RelayCall::On(GATE as u8)]
    );
    // Closed does not react to the command itself; the switches will.
    assert_eq!(app.state(), GateState::Close);
    assert!(sink.events.is_empty());

    hw.inputs.gate_button = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 470, 540);
    assert!(hw.is_on(GATE));
    run(&mut app, &mut hw, &mut sink, 550, 550);
    assert!(!hw.is_on(GATE));

    run(&mut app, &mut hw, &mut sink, 560, 3440);
    assert!(hw.is_on(BYPASS));
    run(&mut app, &mut hw, &mut sink, 3450, 3450);
    assert!(!hw.is_on(BYPASS));
}

#[test]
fn full_open_close_cycle() {
    let (mut app, mut hw, mut sink) = boot_closed();
    sink.take();

    // Drive starts: lower switch releases.
    hw.inputs.down_switch = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 270, 520);
    assert_eq!(app.state(), GateState::Close);
    run(&mut app, &mut hw, &mut sink, 530, 530);
    assert_eq!(app.state(), GateState::Opening);
    assert_eq!(
        sink.take(),
        vec![
            AppEvent::LightChanged(true),
            AppEvent::GateChanged(GateState::Opening),
        ]
    );
    assert!(hw.is_on(LIGHT));

    // Upper switch makes.
    hw.inputs.up_switch = PinState::High;
    run(&mut app, &mut hw, &mut sink, 540, 800);
    assert_eq!(app.state(), GateState::Open);
    assert_eq!(sink.take(), vec![AppEvent::GateChanged(GateState::Open)]);

    // Upper switch releases: closing, light off.
    hw.inputs.up_switch = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 810, 1070);
    assert_eq!(app.state(), GateState::Closing);
    assert_eq!(
        sink.take(),
        vec![
            AppEvent::LightChanged(false),
            AppEvent::GateChanged(GateState::Closing),
        ]
    );
    assert!(!hw.is_on(LIGHT));

    hw.inputs.down_switch = PinState::High;
    run(&mut app, &mut hw, &mut sink, 1080, 1340);
    assert_eq!(app.state(), GateState::Close);
    assert_eq!(sink.take(), vec![AppEvent::GateChanged(GateState::Close)]);
}

/// Hold the gate button long enough to settle, then release it.
fn press(app: &mut AppService, hw: &mut MockHardware, sink: &mut VecSink, at: u64) {
    hw.inputs.gate_button = PinState::High;
    run(app, hw, sink, at, at + 60);
    hw.inputs.gate_button = PinState::Low;
    run(app, hw, sink, at + 70, at + 140);
}

#[test]
fn command_cycles_opening_stop_closing() {
    let (mut app, mut hw, mut sink) = boot_closed();
    hw.inputs.down_switch = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 270, 860);
    assert_eq!(app.state(), GateState::Opening);
    sink.take();

    press(&mut app, &mut hw, &mut sink, 870);
    assert_eq!(app.state(), GateState::Stop);
    press(&mut app, &mut hw, &mut sink, 1020);
    assert_eq!(app.state(), GateState::Closing);
    press(&mut app, &mut hw, &mut sink, 1170);
    assert_eq!(app.state(), GateState::Opening);
    assert_eq!(
        sink.take(),
        vec![
            AppEvent::GateChanged(GateState::Stop),
            AppEvent::GateChanged(GateState::Closing),
            AppEvent::GateChanged(GateState::Opening),
        ]
    );
}

#[test]
fn simultaneous_switch_change_evaluates_final_pair_only() {
    let (mut app, mut hw, mut sink) = boot_closed();
    sink.take();

    hw.inputs.down_switch = PinState::Low;
    hw.inputs.up_switch = PinState::High;
    run(&mut app, &mut hw, &mut sink, 270, 860);

    assert_eq!(app.state(), GateState::Open);
    assert_eq!(
        sink.take(),
        vec![
            AppEvent::LightChanged(true),
            AppEvent::GateChanged(GateState::Open),
        ]
    );
}

#[test]
fn both_switches_made_is_error_until_switches_recover() {
    let (mut app, mut sink) = make_app();
    let mut hw = MockHardware::new();
    hw.inputs.down_switch = PinState::High;
    hw.inputs.up_switch = PinState::High;
    run(&mut app, &mut hw, &mut sink, 0, 260);
    assert_eq!(app.state(), GateState::Error);

    // Commands still pulse the drive but leave the state alone.
    app.handle_command(AppCommand::GateSwitch, &mut sink);
    run(&mut app, &mut hw, &mut sink, 270, 2000);
    assert_eq!(app.state(), GateState::Error);

    hw.inputs.up_switch = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 2010, 2270);
    assert_eq!(app.state(), GateState::Close);
}

#[test]
fn switch_bounce_shorter_than_window_is_ignored() {
    let (mut app, mut hw, mut sink) = boot_closed();
    sink.take();

    let mut now = 270;
    for _ in 0..10 {
        hw.inputs.down_switch = PinState::Low;
        run(&mut app, &mut hw, &mut sink, now, now + 100);
        hw.inputs.down_switch = PinState::High;
        run(&mut app, &mut hw, &mut sink, now + 110, now + 200);
        now += 210;
    }
    run(&mut app, &mut hw, &mut sink, now, now + 500);
    assert_eq!(app.state(), GateState::Close);
    assert!(sink.events.is_empty());
}

#[test]
fn light_button_toggles() {
    let (mut app, mut hw, mut sink) = boot_closed();
    sink.take();

    hw.inputs.light_button = PinState::High;
    run(&mut app, &mut hw, &mut sink, 270, 460);
    assert!(app.light_on());
    assert!(hw.is_on(LIGHT));

    hw.inputs.light_button = PinState::Low;
    run(&mut app, &mut hw, &mut sink, 470, 600);
    assert!(app.light_on());

    hw.inputs.light_button = PinState::High;
    run(&mut app, &mut hw, &mut sink, 610, 700);
    assert!(!app.light_on());
    assert!(!hw.is_on(LIGHT));
    assert_eq!(
        sink.take(),
        vec![AppEvent::LightChanged(true), AppEvent::LightChanged(false)]
    );
}

#[test]
fn remote_commands_land_on_next_apply() {
    let (mut app, mut hw, mut sink) = boot_closed();
    let mark = hw.mark();

    app.handle_command(AppCommand::SetLight(true), &mut sink);
    assert_eq!(hw.mark(), mark);
    assert_eq!(sink.take(), vec![AppEvent::LightChanged(true)]);

    run(&mut app, &mut hw, &mut sink, 270, 270);
    assert_eq!(hw.calls_since(mark), &[RelayCall::On(LIGHT as u8)]);
}

#[test]
fn held_bypass_survives_gate_command() {
    let (mut app, mut hw, mut sink) = boot_closed();

    app.handle_command(AppCommand::SetBypass(true), &mut sink);
    run(&mut app, &mut hw, &mut sink, 270, 270);
    assert!(hw.is_on(BYPASS));

    app.handle_command(AppCommand::GateSwitch, &mut sink);
    run(&mut app, &mut hw, &mut sink, 280, 4000);
    assert!(hw.is_on(BYPASS));
    assert!(!hw.is_on(GATE));

    app.handle_command(AppCommand::SetBypass(false), &mut sink);
    run(&mut app, &mut hw, &mut sink, 4010, 4010);
    assert!(!hw.is_on(BYPASS));
    assert!(!app.photo_bypass_on());
}

#[test]
fn bypass_pulse_outlives_a_later_hold_request() {
    let (mut app, mut hw, mut sink) = boot_closed();

    // Bypass flag off: the command arms a 300-tick bypass pulse.
    app.handle_command(AppCommand::GateSwitch, &mut sink);
    run(&mut app, &mut hw, &mut sink, 270, 1000);
    assert!(hw.is_on(BYPASS));

    // Holding the bypass mid-pulse does not cancel the countdown.
    app.handle_command(AppCommand::SetBypass(true), &mut sink);
    run(&mut app, &mut hw, &mut sink, 1010, 3250);
    assert!(hw.is_on(BYPASS));
    run(&mut app, &mut hw, &mut sink, 3260, 3260);
    assert!(!hw.is_on(BYPASS));
    assert!(app.photo_bypass_on());

    // Re-asserting the flag closes the relay again.
    app.handle_command(AppCommand::SetBypass(true), &mut sink);
    run(&mut app, &mut hw, &mut sink, 3270, 3270);
    assert!(hw.is_on(BYPASS));
}

#[test]
fn command_after_long_stall_never_closes_gate_relay() {
    let (mut app, mut hw, mut sink) = boot_closed();
    let mark = hw.mark();

    // Ten ticks pass before the next cycle: the gate pulse is already spent.
    app.handle_command(AppCommand::GateSwitch, &mut sink);
    run(&mut app, &mut hw, &mut sink, 360, 360);
    assert_eq!(
        hw.calls_since(mark),
        &[RelayCall::On(BYPASS as u8), RelayCall::Off(GATE as u8)]
    );
    assert!(!hw.is_on(GATE));
    assert_eq!(app.relays().channel(BYPASS).map(|c| c.countdown), Some(290));
}

#[test]
fn clock_rollback_does_not_cut_pulse_short() {
    let (mut app, mut hw, mut sink) = boot_closed();

    hw.inputs.gate_button = PinState::High;
    run(&mut app, &mut hw, &mut sink, 270, 340);
    assert!(hw.is_on(GATE));

    // Clock steps back; the remaining 8 ticks are measured from here.
    run(&mut app, &mut hw, &mut sink, 200, 270);
    assert!(hw.is_on(GATE));
    run(&mut app, &mut hw, &mut sink, 280, 280);
    assert!(!hw.is_on(GATE));
}

#[test]
fn restart_command_is_left_to_the_entry_point() {
    let (mut app, mut hw, mut sink) = boot_closed();
    sink.take();
    let mark = hw.mark();

    app.handle_command(AppCommand::Restart, &mut sink);
    run(&mut app, &mut hw, &mut sink, 270, 270);
    assert!(sink.events.is_empty());
    assert_eq!(hw.mark(), mark);
    assert_eq!(app.state(), GateState::Close);
}
