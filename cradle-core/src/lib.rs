//! Board-agnostic core logic for the incubator monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Reading types and the sweep-to-temperature conversion
//! - Alarm/snooze state machine and status derivation
//! - Collaborator traits (analog acquisition, ambient bus, alarm output)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod config;
pub mod reading;
pub mod traits;
