//! Temperature sensor on ADC channel 0.
//!
//! The sensor's 0..5 V output maps linearly onto the ADC span. The scale
//! `raw * 500 / 1024` yields tenths of a volt-equivalent, but the rest of the
//! firmware treats the result as whole degrees Celsius. That scaling is kept
//! as-is; the fan controller and the serial protocol both depend on it.

use super::{ADC_SCALE, EngineeringReading, RawSample, SensorChannel};
use crate::app::ports::AnalogPort;
use crate::error::SensorError;

const FULL_SCALE: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReading {
    pub raw: RawSample,
    pub celsius: EngineeringReading,
}

/// `raw * 500 / 1024`, truncating.
pub const fn convert_temperature(raw: RawSample) -> EngineeringReading {
    ((raw as u32 * FULL_SCALE) / ADC_SCALE) as EngineeringReading
}

/// Sample channel 0 and convert.
pub fn read(adc: &mut impl AnalogPort, timeout_ms: u32) -> Result<TemperatureReading, SensorError> {
    let raw = super::sample(adc, SensorChannel::Temperature, timeout_ms)?;
    Ok(TemperatureReading {
        raw,
        celsius: convert_temperature(raw),
    })
}
