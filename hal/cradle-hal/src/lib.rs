//! Cradle Hardware Abstraction Layer
//!
//! `embedded-hal` covers digital inputs and delays. This crate defines the
//! remaining hardware seams the incubator monitor needs, so that board
//! support crates (Raspberry Pi via pigpio, RP2040, ...) can plug in.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  cradle-drivers (ramp ADC, monitor)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embedded-hal │       │  cradle-hal   │
//! │ InputPin,     │       │ PwmOutput,    │
//! │ DelayNs       │       │ Clock, 1-Wire │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`pwm::PwmOutput`] - Duty and frequency controlled output
//! - [`time::Clock`] - Monotonic millisecond clock
//! - [`onewire::OneWireBus`] - Dallas 1-Wire bus master

#![no_std]
#![deny(unsafe_code)]

pub mod onewire;
pub mod pwm;
pub mod time;

// Re-export key traits at crate root for convenience
pub use onewire::{OneWireBus, OneWireError, RomId};
pub use pwm::PwmOutput;
pub use time::Clock;
