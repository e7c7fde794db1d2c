//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in cradle-core:
//!
//! - Analog acquisition via comparator + swept PWM reference (ramp ADC)
//! - Ambient averaging over a digital sensor bus
//! - DS18B20 1-Wire temperature sensors
//! - PWM alarm speaker
//! - The per-cycle monitor that ties them together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod alarm;
pub mod ambient;
pub mod analog;
pub mod monitor;
pub mod sensor;

pub use monitor::{CycleReport, IncubatorMonitor};
