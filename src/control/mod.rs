//! Closed-loop control laws.

pub mod fan;
