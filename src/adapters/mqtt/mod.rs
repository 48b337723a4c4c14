//! MQTT adapter: the publish/subscribe side of the controller.
//!
//! Three pieces live here:
//!
//! - [`MqttEventSink`] implements [`EventSink`] on top of any
//!   [`MessagingPort`]: maps gate/light events to retained state topics,
//!   drops them while offline, and performs the online handshake
//!   (status, subscriptions) when the link comes up.
//! - [`InboundQueue`] decodes inbound messages in the MQTT client task
//!   and hands the commands to the control loop without blocking either
//!   side.
//! - `esp_impl` (ESP-IDF only) wraps `EspMqttClient` as a `MessagingPort`.
//!
//! ```text
//!  EspMqttClient task ──push──▶ InboundQueue ──pop──▶ control loop
//!   (AppCommand::decode)                               │
//!  MessagingPort ◀── MqttEventSink ◀── AppEvent ◀──────┘
//! ```

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub mod esp_impl;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};

use crate::app::commands::{AppCommand, GATE_SWITCH_TOPIC, LIGHT_TOPIC, RESTART_TOPIC};
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, MessagingPort};
use crate::config::TopicString;
use crate::fsm::GateState;

/// Retained availability topic (`online` / last-will `offline`).
pub const STATUS_TOPIC: &str = "/status";
/// Retained gate state topic.
pub const GATE_STATE_TOPIC: &str = "/gate/state";
/// Retained light state topic.
pub const LIGHT_STATE_TOPIC: &str = "/light/state";

pub const STATUS_ONLINE: &[u8] = b"online";
pub const STATUS_OFFLINE: &[u8] = b"offline";

fn light_payload(on: bool) -> &'static [u8] {
    if on { b"on" } else { b"off" }
}

fn gate_payload(state: GateState) -> &'static [u8] {
    state.as_str().as_bytes()
}

/// Split the device prefix off a full topic.  The remainder must start
/// with `/` to count as one of ours.
pub fn topic_suffix<'a>(topic: &'a str, prefix: &str) -> Option<&'a str> {
    topic
        .strip_prefix(prefix)
        .filter(|suffix| suffix.starts_with('/'))
}

// ───────────────────────────────────────────────────────────────
// Outbound: event sink
// ───────────────────────────────────────────────────────────────

pub struct MqttEventSink<M> {
    link: M,
    bypass_suffix: TopicString,
    was_online: bool,
}

impl<M: MessagingPort> MqttEventSink<M> {
    pub fn new(link: M, bypass_suffix: TopicString) -> Self {
        Self {
            link,
            bypass_suffix,
            was_online: false,
        }
    }

    pub fn link(&self) -> &M {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut M {
        &mut self.link
    }

    /// Follow the connectivity signal.  On an offline → online edge,
    /// publish the retained status and (re)subscribe, then return `true`
    /// so the caller can re-announce the full state.
    pub fn poll_online(&mut self) -> bool {
        let online = self.link.is_online();
        let came_online = online && !self.was_online;
        if self.was_online && !online {
            warn!("MQTT: link offline, notifications paused");
        }
        self.was_online = online;
        if came_online {
            info!("MQTT: link online");
            self.publish(STATUS_TOPIC, STATUS_ONLINE);
            let bypass = self.bypass_suffix.clone();
            for suffix in [GATE_SWITCH_TOPIC, LIGHT_TOPIC, bypass.as_str(), RESTART_TOPIC] {
                if let Err(e) = self.link.subscribe(suffix) {
                    warn!("MQTT: subscribe {} failed: {}", suffix, e);
                }
            }
        }
        came_online
    }

    /// Retained publish; silently skipped while offline.
    fn publish(&mut self, suffix: &str, payload: &[u8]) {
        if !self.link.is_online() {
            return;
        }
        if let Err(e) = self.link.publish(suffix, payload, true) {
            warn!("MQTT: publish {} failed: {}", suffix, e);
        }
    }
}

impl<M: MessagingPort> EventSink for MqttEventSink<M> {
    fn emit(&mut self, event: &AppEvent) {
        match *event {
            AppEvent::GateChanged(state) => {
                self.publish(GATE_STATE_TOPIC, gate_payload(state));
            }
            AppEvent::LightChanged(on) => {
                self.publish(LIGHT_STATE_TOPIC, light_payload(on));
            }
            AppEvent::Snapshot { gate, light } => {
                self.publish(GATE_STATE_TOPIC, gate_payload(gate));
                self.publish(LIGHT_STATE_TOPIC, light_payload(light));
            }
            AppEvent::Started(_) => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound: message queue
// ───────────────────────────────────────────────────────────────

/// Queue depth for inbound commands.
const INBOUND_DEPTH: usize = 8;

/// Bounded, non-blocking hand-off from the MQTT client task to the loop.
///
/// Messages are decoded on the producer side, so the queue only carries
/// [`AppCommand`]s and payload length never matters.
pub struct InboundQueue {
    channel: Channel<CriticalSectionRawMutex, AppCommand, INBOUND_DEPTH>,
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InboundQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Decode and enqueue a message.  Returns `false` (message dropped)
    /// if the topic is not one of ours or the queue is full.
    pub fn push(&self, topic_suffix: &str, payload: &[u8], bypass_suffix: &str) -> bool {
        let Some(cmd) = AppCommand::decode(topic_suffix, payload, bypass_suffix) else {
            warn!("MQTT: unrecognised topic {}", topic_suffix);
            return false;
        };
        if self.channel.try_send(cmd).is_err() {
            warn!("MQTT: inbound queue full, {} dropped", topic_suffix);
            return false;
        }
        true
    }

    pub fn pop(&self) -> Option<AppCommand> {
        self.channel.try_receive().ok()
    }
}

/// Inbound queue shared between the MQTT callback and the control loop.
pub static INBOUND: InboundQueue = InboundQueue::new();
