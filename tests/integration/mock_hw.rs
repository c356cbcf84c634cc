//! Mock hardware adapter for integration tests.
//!
//! Serves scripted ADC values, records every fan and serial call, and can
//! be told to fail any of the three hardware paths.

use climatectl::app::events::AppEvent;
use climatectl::app::ports::{AnalogPort, ClockPort, EventSink, FanPort, SerialPort};
use climatectl::control::fan::ActuatorDuty;
use climatectl::error::{ActuatorError, CommsError, SensorError};
use climatectl::sensors::{RawSample, SensorChannel};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub temperature_raw: RawSample,
    pub humidity_raw: RawSample,
    pub adc_fault: Option<SensorError>,
    pub pwm_fault: bool,
    pub tx_fault: Option<CommsError>,
    pub adc_reads: Vec<(SensorChannel, u32)>,
    pub duties: Vec<ActuatorDuty>,
    pub lines: Vec<String>,
}

impl MockHardware {
    pub fn new(temperature_raw: RawSample, humidity_raw: RawSample) -> Self {
        Self {
            temperature_raw,
            humidity_raw,
            adc_fault: None,
            pwm_fault: false,
            tx_fault: None,
            adc_reads: Vec::new(),
            duties: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn last_duty(&self) -> Option<ActuatorDuty> {
        self.duties.last().copied()
    }

    pub fn lines_starting_with(&self, prefix: &str) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| l.starts_with(prefix))
            .collect()
    }
}

impl AnalogPort for MockHardware {
    fn read_channel(
        &mut self,
        channel: SensorChannel,
        timeout_ms: u32,
    ) -> Result<RawSample, SensorError> {
        self.adc_reads.push((channel, timeout_ms));
        if let Some(e) = self.adc_fault {
            return Err(e);
        }
        Ok(match channel {
            SensorChannel::Temperature => self.temperature_raw,
            SensorChannel::Humidity => self.humidity_raw,
        })
    }
}

impl FanPort for MockHardware {
    fn set_duty(&mut self, duty: ActuatorDuty) -> Result<(), ActuatorError> {
        if self.pwm_fault {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.duties.push(duty);
        Ok(())
    }
}

impl SerialPort for MockHardware {
    fn transmit(&mut self, text: &str, _timeout_ms: u32) -> Result<(), CommsError> {
        if let Some(e) = self.tx_fault {
            return Err(e);
        }
        self.lines.push(text.to_string());
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock {
    pub now_ms: u64,
    pub delays: Vec<u32>,
}

impl ClockPort for MockClock {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now_ms += u64::from(ms);
    }

    fn uptime_ms(&self) -> u64 {
        self.now_ms
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::TaskFailed { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
