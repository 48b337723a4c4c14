//! WiFi station-mode bring-up.
//!
//! The messaging link needs an IP connection before the MQTT client can
//! reach its broker.  Credentials are validated on every target; the
//! actual driver calls exist only on ESP-IDF.
//!
//! ## Retry policy
//!
//! Boot-time connect retries with an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s).  After association the ESP-IDF driver handles
//! reconnects on its own, and the MQTT client follows.

use crate::error::{Error, Result};

const MAX_SSID_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 64;

const FIRST_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<MAX_SSID_LEN>,
    password: heapless::String<MAX_PASSWORD_LEN>,
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

impl WifiCredentials {
    /// SSID: 1-32 printable ASCII bytes.  Password: empty (open network)
    /// or 8-64 bytes (WPA2).
    pub fn new(ssid: &str, password: &str) -> Result<Self> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(Error::Config("invalid WiFi SSID"));
        }
        if !password.is_empty() && password.len() < MIN_PASSWORD_LEN {
            return Err(Error::Config("WiFi password too short"));
        }
        let mut s = heapless::String::new();
        s.push_str(ssid)
            .map_err(|_| Error::Config("invalid WiFi SSID"))?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|_| Error::Config("WiFi password too long"))?;
        Ok(Self {
            ssid: s,
            password: p,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Delay before connect attempt `attempt` (1-based; the first attempt
/// is immediate).
pub fn backoff_secs(attempt: u32) -> u32 {
    if attempt <= 1 {
        return 0;
    }
    FIRST_BACKOFF_SECS
        .saturating_mul(1u32.checked_shl(attempt - 2).unwrap_or(u32::MAX))
        .min(MAX_BACKOFF_SECS)
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF station bring-up
// ───────────────────────────────────────────────────────────────

#[cfg(all(target_os = "espidf", feature = "espidf"))]
pub use esp::connect;

#[cfg(all(target_os = "espidf", feature = "espidf"))]
mod esp {
    use anyhow::anyhow;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{backoff_secs, WifiCredentials};

    /// Associate and wait for an IP, retrying with backoff until it works.
    pub fn connect(
        modem: Modem,
        sys_loop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        creds: &WifiCredentials,
    ) -> anyhow::Result<EspWifi<'static>> {
        let mut esp_wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs))?;
        let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sys_loop)?;

        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: creds
                .ssid()
                .try_into()
                .map_err(|_| anyhow!("WiFi SSID too long"))?,
            password: creds
                .password()
                .try_into()
                .map_err(|_| anyhow!("WiFi password too long"))?,
            auth_method: if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        }))?;
        wifi.start()?;
        info!("WiFi: connecting to '{}'", creds.ssid());

        let mut attempt = 1;
        loop {
            let result = wifi.connect().and_then(|_| wifi.wait_netif_up());
            match result {
                Ok(()) => break,
                Err(e) => {
                    attempt += 1;
                    let delay = backoff_secs(attempt);
                    warn!("WiFi: connect failed ({}), retry in {} s", e, delay);
                    let _ = wifi.disconnect();
                    FreeRtos::delay_ms(delay * 1000);
                }
            }
        }
        info!("WiFi: connected after {} attempt(s)", attempt);
        drop(wifi);
        Ok(esp_wifi)
    }
}
