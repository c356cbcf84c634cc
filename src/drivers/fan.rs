//! Cooling-fan PWM driver.
//!
//! Takes the controller's 8-bit duty and scales it onto whatever resolution
//! the underlying embedded-hal PWM channel has. A dumb actuator: deciding
//! the duty is the fan controller's job.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::control::fan::{ActuatorDuty, DUTY_MAX};
use crate::error::ActuatorError;

pub struct FanDriver<P> {
    pwm: P,
}

impl<P: SetDutyCycle> FanDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn set(&mut self, duty: ActuatorDuty) -> Result<(), ActuatorError> {
        let result = if duty == 0 {
            self.pwm.set_duty_cycle_fully_off()
        } else {
            self.pwm
                .set_duty_cycle_fraction(u16::from(duty), u16::from(DUTY_MAX))
        };
        result.map_err(|e| {
            warn!("fan: PWM write failed: {:?}", e);
            ActuatorError::PwmWriteFailed
        })
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set(0)
    }

    #[cfg(test)]
    pub(crate) fn pwm(&self) -> &P {
        &self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorKind, ErrorType};

    /// 10-bit PWM channel that records raw writes.
    struct MockPwm {
        writes: Vec<u16>,
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1023
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.writes.push(duty);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Fault;

    impl embedded_hal::pwm::Error for Fault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct FailingPwm;

    impl ErrorType for FailingPwm {
        type Error = Fault;
    }

    impl SetDutyCycle for FailingPwm {
        fn max_duty_cycle(&self) -> u16 {
            255
        }

        fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
            Err(Fault)
        }
    }

    #[test]
    fn scales_8_bit_duty_onto_channel_resolution() {
        let mut fan = FanDriver::new(MockPwm { writes: Vec::new() });
        fan.set(255).unwrap();
        fan.set(51).unwrap();
        fan.set(0).unwrap();
        // 51/255 of 1023 = 204.6 → 204
        assert_eq!(fan.pwm.writes, vec![1023, 204, 0]);
    }

    #[test]
    fn stop_drives_channel_fully_off() {
        let mut fan = FanDriver::new(MockPwm { writes: Vec::new() });
        fan.set(128).unwrap();
        fan.stop().unwrap();
        assert_eq!(fan.pwm.writes.last(), Some(&0));
    }

    #[test]
    fn pwm_failure_maps_to_actuator_error() {
        let mut fan = FanDriver::new(FailingPwm);
        assert_eq!(fan.set(100), Err(ActuatorError::PwmWriteFailed));
        assert_eq!(fan.stop(), Err(ActuatorError::PwmWriteFailed));
    }
}
