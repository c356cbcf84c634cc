//! Latest-known controller state.
//!
//! `ControllerContext` replaces the firmware's process-wide readings: the
//! scheduler thread owns it exclusively and hands it to each task pipeline
//! by `&mut`, so a reader never sees a half-updated cycle.

use crate::control::fan::ActuatorDuty;
use crate::sensors::EngineeringReading;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerContext {
    /// Last converted temperature (whole degrees).
    pub current_temperature: EngineeringReading,
    /// Last converted relative humidity (percent).
    pub current_humidity: EngineeringReading,
    /// Duty the fan was last successfully commanded to.
    pub fan_duty: ActuatorDuty,
}
