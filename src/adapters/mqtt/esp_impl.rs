//! ESP-IDF MQTT client as a [`MessagingPort`].
//!
//! The client runs on its own ESP-IDF task.  Its event callback only
//! flips the connectivity flag and decodes inbound messages into
//! [`INBOUND`]; everything else happens on the control loop.

use core::sync::atomic::{AtomicBool, Ordering};
use core::fmt::Write as _;

use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttEvent, EventPayload, LwtConfiguration, MqttClientConfiguration,
    QoS,
};
use esp_idf_svc::sys::EspError;
use log::{info, warn};

use super::{topic_suffix, INBOUND, STATUS_OFFLINE, STATUS_TOPIC};
use crate::app::ports::MessagingPort;
use crate::config::TopicString;
use crate::error::CommsError;

/// Full topic = prefix + suffix.
type FullTopic = heapless::String<96>;

static ONLINE: AtomicBool = AtomicBool::new(false);

pub struct EspMqttMessaging {
    client: EspMqttClient<'static>,
    prefix: TopicString,
}

impl EspMqttMessaging {
    /// Connect to `url`.  The broker publishes retained `offline` on
    /// `<prefix>/status` if the connection drops.  `bypass_suffix` is the
    /// configured photo-bypass topic the callback decodes against.
    pub fn new(
        url: &str,
        client_id: &str,
        prefix: &TopicString,
        bypass_suffix: &TopicString,
    ) -> Result<Self, EspError> {
        let owned_prefix = prefix.clone();
        let lwt_topic = join(prefix, STATUS_TOPIC);

        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            lwt: Some(LwtConfiguration {
                topic: lwt_topic.as_str(),
                payload: STATUS_OFFLINE,
                qos: QoS::AtLeastOnce,
                retain: true,
            }),
            ..Default::default()
        };

        let cb_prefix = owned_prefix.clone();
        let cb_bypass = bypass_suffix.clone();
        let client = EspMqttClient::new_cb(url, &conf, move |event: EspMqttEvent<'_>| {
            on_event(&cb_prefix, &cb_bypass, event.payload());
        })?;
        info!("MQTT: client started for {}", url);

        Ok(Self {
            client,
            prefix: owned_prefix,
        })
    }
}

fn on_event(prefix: &str, bypass_suffix: &str, payload: EventPayload<'_, EspError>) {
    match payload {
        EventPayload::Connected(_) => ONLINE.store(true, Ordering::Release),
        EventPayload::Disconnected => ONLINE.store(false, Ordering::Release),
        EventPayload::Received {
            topic: Some(topic),
            data,
            details,
            ..
        } => {
            let payload: &[u8] = match details {
                Details::Complete => data,
                // A payload split across chunks is never exactly `true`.
                Details::InitialChunk(_) => &[],
                // Only the first chunk carries the topic.
                Details::SubsequentChunk(_) => return,
            };
            match topic_suffix(topic, prefix) {
                Some(suffix) => {
                    INBOUND.push(suffix, payload, bypass_suffix);
                }
                None => warn!("MQTT: foreign topic {}", topic),
            }
        }
        EventPayload::Error(e) => warn!("MQTT: {:?}", e),
        _ => {}
    }
}

fn join(prefix: &str, suffix: &str) -> FullTopic {
    let mut full = FullTopic::new();
    let _ = write!(full, "{}{}", prefix, suffix);
    full
}

impl MessagingPort for EspMqttMessaging {
    fn is_online(&self) -> bool {
        ONLINE.load(Ordering::Acquire)
    }

    fn publish(
        &mut self,
        topic_suffix: &str,
        payload: &[u8],
        retain: bool,
    ) -> Result<(), CommsError> {
        if !self.is_online() {
            return Err(CommsError::Offline);
        }
        let topic = self.full_topic(topic_suffix)?;
        self.client
            .enqueue(&topic, QoS::AtLeastOnce, retain, payload)
            .map(|_| ())
            .map_err(|_| CommsError::MqttPublishFailed)
    }

    fn subscribe(&mut self, topic_suffix: &str) -> Result<(), CommsError> {
        let topic = self.full_topic(topic_suffix)?;
        self.client
            .subscribe(&topic, QoS::AtLeastOnce)
            .map(|_| ())
            .map_err(|_| CommsError::MqttSubscribeFailed)
    }
}

impl EspMqttMessaging {
    fn full_topic(&self, suffix: &str) -> Result<FullTopic, CommsError> {
        let mut full = FullTopic::new();
        write!(full, "{}{}", self.prefix, suffix).map_err(|_| CommsError::TopicTooLong)?;
        Ok(full)
    }
}
