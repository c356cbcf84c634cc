//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the control rules for the climate controller:
//! task orchestration, conversion, fan control and reporting. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod context;
pub mod events;
pub mod ports;
pub mod service;
