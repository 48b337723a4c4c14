//! Gatekeeper Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter      LogEventSink     Esp32TimeAdapter      │
//! │  (Input+RelayPort)    (EventSink)      (monotonic ms)        │
//! │  EspMqttMessaging ──▶ MqttEventSink ◀── INBOUND queue        │
//! │  (MessagingPort)      (EventSink)       (MQTT task → loop)   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                   │  │
//! │  │  DebouncedInput · GateController · RelayScheduler      │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, Input, PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use gatekeeper::adapters::hardware::{HardwareAdapter, InputPins};
use gatekeeper::adapters::log_sink::LogEventSink;
use gatekeeper::adapters::mqtt::esp_impl::EspMqttMessaging;
use gatekeeper::adapters::mqtt::{MqttEventSink, INBOUND};
use gatekeeper::adapters::time::Esp32TimeAdapter;
use gatekeeper::adapters::wifi::{self, WifiCredentials};
use gatekeeper::app::commands::AppCommand;
use gatekeeper::app::service::AppService;
use gatekeeper::config::GateConfig;
use gatekeeper::drivers::relay_board::RelayBoard;
use gatekeeper::pins;

const WIFI_SSID: &str = match option_env!("GATE_WIFI_SSID") {
    Some(s) => s,
    None => "",
};
const WIFI_PASSWORD: &str = match option_env!("GATE_WIFI_PASSWORD") {
    Some(s) => s,
    None => "",
};
const MQTT_URL: &str = match option_env!("GATE_MQTT_URL") {
    Some(s) => s,
    None => "mqtt://192.168.1.10:1883",
};

/// Claim a GPIO by number from [`pins`].
fn gpio(num: i32) -> AnyIOPin {
    // SAFETY: every number in `pins` is distinct and claimed exactly once,
    // and `peripherals.pins` is never used alongside.
    unsafe { AnyIOPin::new(num) }
}

fn input(num: i32) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    let mut driver = PinDriver::input(gpio(num))?;
    driver.set_pull(Pull::Down)?;
    Ok(driver)
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Gatekeeper v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = match option_env!("GATE_CONFIG_JSON") {
        Some(json) => GateConfig::from_json(json.as_bytes())?,
        None => GateConfig::default(),
    };
    config.validate()?;
    info!("Config: topic prefix '{}'", config.topic_prefix);

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        gpio(pins::I2C_SDA_GPIO),
        gpio(pins::I2C_SCL_GPIO),
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ)),
    )?;
    let inputs = InputPins {
        gate_button: input(pins::GATE_BUTTON_GPIO)?,
        light_button: input(pins::LIGHT_BUTTON_GPIO)?,
        down_switch: input(pins::GATE_DOWN_SWITCH_GPIO)?,
        up_switch: input(pins::GATE_UP_SWITCH_GPIO)?,
    };
    let mut hw = HardwareAdapter::new(inputs, RelayBoard::new(i2c, pins::RELAY_BOARD_I2C_ADDR));
    hw.all_off();

    // ── 3. Network ────────────────────────────────────────────
    let creds = WifiCredentials::new(WIFI_SSID, WIFI_PASSWORD)?;
    let _wifi = wifi::connect(peripherals.modem, sys_loop, nvs, &creds)?;

    let link = EspMqttMessaging::new(
        MQTT_URL,
        &config.topic_prefix,
        &config.topic_prefix,
        &config.bypass_suffix,
    )?;
    let mut mqtt_sink = MqttEventSink::new(link, config.bypass_suffix.clone());
    let mut log_sink = LogEventSink::new();

    // ── 4. Application core ───────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let loop_period_ms = config.loop_period_ms;
    let mut app = AppService::new(config);
    app.start(&mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        if mqtt_sink.poll_online() {
            app.announce(&mut mqtt_sink);
        }

        while let Some(cmd) = INBOUND.pop() {
            if cmd == AppCommand::Restart {
                warn!("Restart requested over MQTT");
                hw.all_off();
                esp_idf_svc::hal::reset::restart();
            }
            app.handle_command(cmd, &mut (&mut log_sink, &mut mqtt_sink));
        }

        app.tick(time.uptime_ms(), &mut hw, &mut (&mut log_sink, &mut mqtt_sink));

        FreeRtos::delay_ms(loop_period_ms);
    }
}
