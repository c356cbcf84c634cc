//! Serial telemetry lines.
//!
//! Human-readable ASCII, one reading per line, `\r\n` terminated:
//!
//! ```text
//! Hello, World!
//! Temp: 299 C, Fan Speed: 100%
//! Humidity: 50%
//! ```
//!
//! Lines are rendered into a fixed-capacity buffer so reporting never
//! allocates, then handed to the [`SerialPort`].

use core::fmt::Write;

use heapless::String;

use crate::app::ports::SerialPort;
use crate::control::fan::{ActuatorDuty, duty_percent};
use crate::error::CommsError;
use crate::sensors::EngineeringReading;

/// Longest line is `"Temp: 65535 C, Fan Speed: 100%\r\n"` (32 bytes).
pub const LINE_CAPACITY: usize = 48;

/// A single rendered telemetry line.
pub type Line = String<LINE_CAPACITY>;

/// Sent once before the scheduler starts.
pub const BANNER: &str = "Hello, World!\r\n";

pub fn temperature_line(
    celsius: EngineeringReading,
    fan_duty: ActuatorDuty,
) -> Result<Line, CommsError> {
    let mut line = Line::new();
    write!(
        line,
        "Temp: {} C, Fan Speed: {}%\r\n",
        celsius,
        duty_percent(fan_duty)
    )
    .map_err(|_| CommsError::LineOverflow)?;
    Ok(line)
}

pub fn humidity_line(percent: EngineeringReading) -> Result<Line, CommsError> {
    let mut line = Line::new();
    write!(line, "Humidity: {}%\r\n", percent).map_err(|_| CommsError::LineOverflow)?;
    Ok(line)
}

/// Formats readings and pushes them out over the serial link.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryReporter {
    tx_timeout_ms: u32,
}

impl TelemetryReporter {
    pub fn new(tx_timeout_ms: u32) -> Self {
        Self { tx_timeout_ms }
    }

    pub fn banner(&self, serial: &mut impl SerialPort) -> Result<(), CommsError> {
        serial.transmit(BANNER, self.tx_timeout_ms)
    }

    pub fn report_temperature(
        &self,
        serial: &mut impl SerialPort,
        celsius: EngineeringReading,
        fan_duty: ActuatorDuty,
    ) -> Result<(), CommsError> {
        let line = temperature_line(celsius, fan_duty)?;
        serial.transmit(&line, self.tx_timeout_ms)
    }

    pub fn report_humidity(
        &self,
        serial: &mut impl SerialPort,
        percent: EngineeringReading,
    ) -> Result<(), CommsError> {
        let line = humidity_line(percent)?;
        serial.transmit(&line, self.tx_timeout_ms)
    }
}
