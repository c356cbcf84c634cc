//! Climate controller firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter              LogEventSink     SystemClock   │
//! │  (Analog + Fan + Serial)      (EventSink)      (ClockPort)   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │           ControllerService (pure logic)               │  │
//! │  │  Scheduler · Convert · Fan control · Telemetry         │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! On a host build the same loop runs as a simulation: the serial
//! protocol goes to stdout and diagnostics go to stderr.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use climatectl::adapters::hardware::HardwareAdapter;
use climatectl::adapters::log_sink::LogEventSink;
use climatectl::adapters::time::SystemClock;
use climatectl::app::service::ControllerService;
use climatectl::config::ControllerConfig;
use climatectl::drivers::fan::FanDriver;
use climatectl::drivers::hw_init::{self, LedcPwm};

fn main() -> Result<()> {
    // ── 1. Runtime + logger bootstrap ─────────────────────────
    #[cfg(feature = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(feature = "espidf"))]
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("climatectl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (compile-time defaults) ──────────────
    let config = ControllerConfig::default();
    config.validate()?;

    // ── 3. Peripherals: UART, ADC, PWM ────────────────────────
    if let Err(e) = hw_init::init_peripherals(&config) {
        // No supervisory layer to fall back to.
        error!("HAL init failed: {}, halting", e);
        return Err(e.into());
    }

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(FanDriver::new(LedcPwm::fan()));
    let mut clock = SystemClock::new();
    let mut log_sink = LogEventSink::new();

    // ── 5. Service ────────────────────────────────────────────
    let mut app = ControllerService::new(&config)?;
    if let Err(e) = app.start(&mut hw, &mut log_sink) {
        warn!("Startup banner not sent: {}", e);
    }

    info!(
        "System ready: temperature every {} ms, humidity every {} ms",
        config.temperature_period_ticks * config.tick_interval_ms,
        config.humidity_period_ticks * config.tick_interval_ms
    );

    // ── 6. Control loop (never returns) ───────────────────────
    app.run(&mut hw, &mut clock, &mut log_sink)
}
