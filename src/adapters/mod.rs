//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements            | Connects to                 |
//! |----------------|-----------------------|-----------------------------|
//! | `hardware`     | InputPort, RelayPort  | GPIO inputs, I²C relay board|
//! | `log_sink`     | EventSink             | Serial log output           |
//! | `mqtt`         | EventSink             | any MessagingPort           |
//! | `mqtt::esp_impl`| MessagingPort        | ESP-IDF MQTT client         |
//! | `time`         | -                     | ESP32 system timer          |
//! | `wifi`         | -                     | ESP-IDF WiFi STA            |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
