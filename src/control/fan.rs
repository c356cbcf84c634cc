//! Proportional fan controller
//!
//! Maps temperature error above the setpoint onto a PWM duty. No integral or
//! derivative terms: the only requirement is that more heat never means less
//! cooling.

use log::trace;

use crate::app::ports::FanPort;
use crate::config::ControllerConfig;
use crate::error::ActuatorError;
use crate::sensors::EngineeringReading;

/// 8-bit PWM duty, `0` = fan off.
pub type ActuatorDuty = u8;

/// Full-scale duty.
pub const DUTY_MAX: ActuatorDuty = 255;

/// Default setpoint in whole degrees.
pub const DEFAULT_TARGET: EngineeringReading = 25;

/// Default error span (degrees) that maps to full duty.
pub const DEFAULT_SPAN: u16 = 50;

/// Fan controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanController {
    target: EngineeringReading,
    span: u16,
    floor: ActuatorDuty,
    ceiling: ActuatorDuty,
}

impl FanController {
    pub fn new(target: EngineeringReading, span: u16) -> Self {
        Self {
            target,
            span: span.max(1),
            floor: 0,
            ceiling: DUTY_MAX,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        let mut fan = Self::new(config.target_temperature, config.proportional_span);
        fan.set_limits(config.duty_floor, config.duty_ceiling);
        fan
    }

    /// Set output limits applied whenever the fan is on
    pub fn set_limits(&mut self, floor: ActuatorDuty, ceiling: ActuatorDuty) {
        self.floor = floor.min(ceiling);
        self.ceiling = ceiling;
    }

    pub fn target(&self) -> EngineeringReading {
        self.target
    }

    /// Duty for `temperature`: off at or below target, otherwise
    /// `(t - target) * 255 / span` clamped to the limits.
    pub fn compute_duty(&self, temperature: EngineeringReading) -> ActuatorDuty {
        if temperature <= self.target {
            return 0;
        }
        let error = u32::from(temperature - self.target);
        let duty = error * u32::from(DUTY_MAX) / u32::from(self.span);
        duty.clamp(u32::from(self.floor), u32::from(self.ceiling)) as ActuatorDuty
    }

    /// Compute the duty and command it. Returns the duty the fan now runs at.
    pub fn apply(
        &self,
        temperature: EngineeringReading,
        fan: &mut impl FanPort,
    ) -> Result<ActuatorDuty, ActuatorError> {
        let duty = self.compute_duty(temperature);
        trace!("fan: T={} target={} -> duty {}", temperature, self.target, duty);
        fan.set_duty(duty)?;
        Ok(duty)
    }
}

impl Default for FanController {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET, DEFAULT_SPAN)
    }
}

/// Duty with the default setpoint, span and limits.
pub fn compute_duty(temperature: EngineeringReading, target: EngineeringReading) -> ActuatorDuty {
    FanController::new(target, DEFAULT_SPAN).compute_duty(temperature)
}

/// Duty as a truncated percentage of full scale.
pub const fn duty_percent(duty: ActuatorDuty) -> u8 {
    (duty as u16 * 100 / DUTY_MAX as u16) as u8
}
