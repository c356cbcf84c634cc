//! Analog sensor channels and the raw-to-engineering-unit conversions.
//!
//! Both sensors hang off the same 10-bit ADC. The conversions are pure
//! integer maps; reading the ADC goes through [`AnalogPort`] so the domain
//! never touches the converter directly.

pub mod humidity;
pub mod temperature;

use crate::app::ports::AnalogPort;
use crate::error::SensorError;

/// A 10-bit ADC sample, `0..=ADC_MAX`.
pub type RawSample = u16;

/// A converted reading: whole degrees for temperature, percent for humidity.
pub type EngineeringReading = u16;

/// Largest value a 10-bit conversion can produce.
pub const ADC_MAX: RawSample = 1023;

/// Full-scale divisor used by both conversions.
pub(crate) const ADC_SCALE: u32 = 1024;

/// Which analog input is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorChannel {
    Temperature = 0,
    Humidity = 1,
}

impl SensorChannel {
    /// Multiplexer index of this channel.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Reject samples a 10-bit converter cannot have produced.
pub fn check_range(raw: RawSample) -> Result<RawSample, SensorError> {
    if raw > ADC_MAX {
        Err(SensorError::OutOfRange(raw))
    } else {
        Ok(raw)
    }
}

/// Read one channel and range-check the result.
pub(crate) fn sample(
    adc: &mut impl AnalogPort,
    channel: SensorChannel,
    timeout_ms: u32,
) -> Result<RawSample, SensorError> {
    let raw = adc.read_channel(channel, timeout_ms)?;
    check_range(raw)
}
