//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (ADC, fan PWM, UART, clock, event sinks) implement these
//! traits. The [`ControllerService`](super::service::ControllerService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! Every blocking wait is bounded: callers pass the timeout, and adapters
//! return a typed error instead of spinning forever.

use crate::control::fan::ActuatorDuty;
use crate::error::{ActuatorError, CommsError, SensorError};
use crate::sensors::{RawSample, SensorChannel};

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one-shot analog conversions.
pub trait AnalogPort {
    /// Select `channel`, start a conversion and wait up to `timeout_ms`
    /// for it to complete.
    fn read_channel(
        &mut self,
        channel: SensorChannel,
        timeout_ms: u32,
    ) -> Result<RawSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Fan port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the cooling fan's PWM channel.
pub trait FanPort {
    /// Set the fan duty, `0` = off, `255` = full speed.
    fn set_duty(&mut self, duty: ActuatorDuty) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain → UART)
// ───────────────────────────────────────────────────────────────

/// Text output towards the host. Lines carry their own `\r\n`.
pub trait SerialPort {
    /// Queue `text` for transmission, waiting at most `timeout_ms` for the
    /// transmitter to accept it.
    fn transmit(&mut self, text: &str, timeout_ms: u32) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Blocking delay plus a free-running millisecond counter.
pub trait ClockPort {
    /// Park the thread for roughly `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds since boot (monotonic).
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the pipelines)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a task's interval
/// counter matures.
///
/// The [`Scheduler`](crate::scheduler::Scheduler) only counts ticks; it
/// knows nothing about sensors, the fan or the UART.
pub trait SchedulerDelegate {
    fn on_task_fired(&mut self, task: TaskId);
}

/// The two periodic tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Sample temperature, drive the fan, report both.
    Temperature,
    /// Sample humidity and report it.
    Humidity,
}
