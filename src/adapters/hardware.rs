//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the fan driver and routes ADC / UART access through
//! [`hw_init`](crate::drivers::hw_init). This is the only module the
//! control loop reaches hardware through. On non-espidf targets the
//! underlying calls use cfg-gated simulation stubs.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{AnalogPort, FanPort, SerialPort};
use crate::control::fan::ActuatorDuty;
use crate::drivers::fan::FanDriver;
use crate::drivers::hw_init;
use crate::error::{ActuatorError, CommsError, SensorError};
use crate::pins;
use crate::sensors::{RawSample, SensorChannel};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    fan: FanDriver<P>,
}

impl<P: SetDutyCycle> HardwareAdapter<P> {
    /// Take ownership of the fan and force it off until the first
    /// temperature sample decides otherwise.
    pub fn new(mut fan: FanDriver<P>) -> Self {
        if let Err(e) = fan.stop() {
            warn!("hardware: could not stop fan at startup: {}", e);
        }
        Self { fan }
    }
}

/// ADC1 channel wired to each sensor.
pub const fn adc_channel(channel: SensorChannel) -> u32 {
    match channel {
        SensorChannel::Temperature => pins::TEMPERATURE_ADC_CHANNEL,
        SensorChannel::Humidity => pins::HUMIDITY_ADC_CHANNEL,
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl<P: SetDutyCycle> AnalogPort for HardwareAdapter<P> {
    fn read_channel(
        &mut self,
        channel: SensorChannel,
        timeout_ms: u32,
    ) -> Result<RawSample, SensorError> {
        hw_init::adc_read(adc_channel(channel), timeout_ms)
    }
}

// ── FanPort implementation ────────────────────────────────────

impl<P: SetDutyCycle> FanPort for HardwareAdapter<P> {
    fn set_duty(&mut self, duty: ActuatorDuty) -> Result<(), ActuatorError> {
        self.fan.set(duty)
    }
}

// ── SerialPort implementation ─────────────────────────────────

impl<P: SetDutyCycle> SerialPort for HardwareAdapter<P> {
    fn transmit(&mut self, text: &str, timeout_ms: u32) -> Result<(), CommsError> {
        hw_init::uart_write(text.as_bytes(), timeout_ms)
    }
}
