//! Climate controller firmware library.
//!
//! Samples a temperature and a humidity sensor, drives a cooling fan in
//! proportion to the temperature error and reports readings over a serial
//! link. Exposes the pure-logic modules for integration testing; all
//! ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod telemetry;

pub mod adapters;
pub mod drivers;

mod pins;
