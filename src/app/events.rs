//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. They are the
//! diagnostic side channel; the serial telemetry lines are separate.

use crate::control::fan::ActuatorDuty;
use crate::error::Error;
use crate::sensors::{EngineeringReading, RawSample};

use super::ports::TaskId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started and sent its banner.
    Started,

    /// A temperature sample was converted and the fan updated.
    TemperatureSampled {
        raw: RawSample,
        celsius: EngineeringReading,
        fan_duty: ActuatorDuty,
    },

    /// A humidity sample was converted.
    HumiditySampled {
        raw: RawSample,
        percent: EngineeringReading,
    },

    /// A task step failed; previous readings were kept.
    TaskFailed { task: TaskId, error: Error },
}

/// A point-in-time snapshot of the controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub temperature: EngineeringReading,
    pub humidity: EngineeringReading,
    pub fan_duty: ActuatorDuty,
    pub fan_percent: u8,
    pub tick_count: u64,
}
