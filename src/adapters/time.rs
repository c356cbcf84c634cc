//! Clock adapter.
//!
//! Provides the tick delay and the monotonic uptime counter.
//!
//! - **`espidf` feature** — `FreeRtos::delay_ms` for the tick wait
//!   (needs `CONFIG_FREERTOS_HZ=1000` for 1 ms resolution, see
//!   `sdkconfig.defaults`), `Ets` busy-wait for sub-millisecond delays and
//!   `esp_timer_get_time()` for uptime.
//! - **without `espidf`** — `std::thread::sleep` and
//!   `std::time::Instant` for host-side simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

/// Monotonic clock + blocking delay for the control loop.
pub struct SystemClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl DelayNs for SystemClock {
    #[cfg(feature = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_svc::hal::delay::Ets::delay_us(ns.div_ceil(1000));
    }

    #[cfg(not(feature = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()));
    }

    #[cfg(feature = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(feature = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms.into()));
    }
}

impl ClockPort for SystemClock {
    fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(self, ms);
    }

    fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }
}
