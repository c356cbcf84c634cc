//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                        | Connects to                |
//! |------------|-----------------------------------|----------------------------|
//! | `hardware` | AnalogPort, FanPort, SerialPort   | ESP32 ADC1, LEDC, UART     |
//! | `log_sink` | EventSink                         | `log` facade               |
//! | `time`     | ClockPort, DelayNs                | FreeRTOS delay, esp_timer  |

pub mod hardware;
pub mod log_sink;
pub mod time;
