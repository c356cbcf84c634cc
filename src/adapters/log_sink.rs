//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger on target, env_logger on host). The
//! serial telemetry lines are not part of this stream.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::fan::duty_percent;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    failures: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task failures seen since startup.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | banner sent, control loop starting");
            }
            AppEvent::TemperatureSampled {
                raw,
                celsius,
                fan_duty,
            } => {
                debug!(
                    "TEMP  | raw={} T={} | fan duty={} ({}%)",
                    raw,
                    celsius,
                    fan_duty,
                    duty_percent(*fan_duty)
                );
            }
            AppEvent::HumiditySampled { raw, percent } => {
                debug!("HUMID | raw={} RH={}%", raw, percent);
            }
            AppEvent::TaskFailed { task, error } => {
                self.failures = self.failures.saturating_add(1);
                warn!(
                    "FAULT | {:?} task: {} (keeping previous readings, total {})",
                    task, error, self.failures
                );
            }
        }
    }
}
