//! ESP32 time adapter.
//!
//! Provides the monotonic millisecond clock that paces debouncing and
//! relay ticks.
//!
//! - **`target_os = "espidf"` with the `espidf` feature**: wraps
//!   `esp_timer_get_time()` from the ESP-IDF high-resolution timer
//!   (microsecond precision, monotonic).
//! - **otherwise**: uses `std::time::Instant` for host-side testing and
//!   simulation.

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Milliseconds since boot (monotonic).
    pub fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }
}
