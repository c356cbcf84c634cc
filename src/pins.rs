//! GPIO / peripheral assignments for the controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// Host builds only use the ADC channel numbers.
#![cfg_attr(not(feature = "espidf"), allow(dead_code))]

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Temperature sensor, 0 – 5 V output through a 2:3 divider.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const TEMPERATURE_ADC_CHANNEL: u32 = 0;

/// Humidity sensor, linear 0 – 100 % output.
/// ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const HUMIDITY_ADC_CHANNEL: u32 = 1;

/// Bits discarded from the native 12-bit conversion to get a 10-bit sample.
pub const ADC_DOWNSHIFT: u32 = 2;

// ---------------------------------------------------------------------------
// Cooling fan
// ---------------------------------------------------------------------------

/// LEDC PWM output to the fan's MOSFET gate.
pub const FAN_PWM_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// UART (telemetry)
// ---------------------------------------------------------------------------

pub const UART_PORT: i32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the fan (25 kHz, inaudible).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
