//! System configuration parameters
//!
//! All tunable parameters for the controller. The defaults are the
//! compile-time constants the firmware ships with; nothing is loaded from
//! storage at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Timing ---
    /// Scheduler tick length (milliseconds)
    pub tick_interval_ms: u32,
    /// Temperature + fan task period (ticks)
    pub temperature_period_ticks: u32,
    /// Humidity task period (ticks)
    pub humidity_period_ticks: u32,

    // --- Fan control ---
    /// Setpoint in whole degrees; at or below it the fan is off
    pub target_temperature: u16,
    /// Degrees above target that map to full duty before clamping
    pub proportional_span: u16,
    /// Lowest duty ever commanded
    pub duty_floor: u8,
    /// Highest duty ever commanded
    pub duty_ceiling: u8,

    // --- Serial ---
    /// UART baud rate
    pub baud_rate: u32,

    // --- HAL timeouts ---
    /// Maximum wait for one ADC conversion (milliseconds)
    pub adc_timeout_ms: u32,
    /// Maximum wait for the UART to accept one line (milliseconds)
    pub tx_timeout_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 1,
            temperature_period_ticks: 100, // 10 Hz
            humidity_period_ticks: 200,    // 5 Hz

            // Fan control
            target_temperature: 25,
            proportional_span: 50,
            duty_floor: 0,
            duty_ceiling: 255,

            // Serial
            baud_rate: 9600,

            // HAL timeouts
            adc_timeout_ms: 2,
            tx_timeout_ms: 50,
        }
    }
}

impl ControllerConfig {
    /// Reject parameter combinations the scheduler or controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero"));
        }
        if self.temperature_period_ticks == 0 || self.humidity_period_ticks == 0 {
            return Err(Error::Config("task periods must be non-zero"));
        }
        if self.proportional_span == 0 {
            return Err(Error::Config("proportional_span must be non-zero"));
        }
        if self.duty_floor > self.duty_ceiling {
            return Err(Error::Config("duty_floor above duty_ceiling"));
        }
        if self.baud_rate == 0 {
            return Err(Error::Config("baud_rate must be non-zero"));
        }
        if self.adc_timeout_ms == 0 || self.tx_timeout_ms == 0 {
            return Err(Error::Config("HAL timeouts must be non-zero"));
        }
        Ok(())
    }

    /// UART clock divisor for a 16x oversampling peripheral
    /// (`clock / 16 / baud - 1`). Zero when `baud_rate` is zero.
    pub fn uart_divisor(&self, clock_hz: u32) -> u32 {
        (clock_hz / 16)
            .checked_div(self.baud_rate)
            .map_or(0, |d| d.saturating_sub(1))
    }
}
