//! Relative humidity sensor on ADC channel 1.

use super::{ADC_SCALE, EngineeringReading, RawSample, SensorChannel};
use crate::app::ports::AnalogPort;
use crate::error::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumidityReading {
    pub raw: RawSample,
    pub percent: EngineeringReading,
}

/// `raw * 100 / 1024`, truncating. Always in `0..=99` for 10-bit input.
pub const fn convert_humidity(raw: RawSample) -> EngineeringReading {
    ((raw as u32 * 100) / ADC_SCALE) as EngineeringReading
}

/// Sample channel 1 and convert.
pub fn read(adc: &mut impl AnalogPort, timeout_ms: u32) -> Result<HumidityReading, SensorError> {
    let raw = super::sample(adc, SensorChannel::Humidity, timeout_ms)?;
    Ok(HumidityReading {
        raw,
        percent: convert_humidity(raw),
    })
}
