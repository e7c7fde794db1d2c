//! Analog acquisition
//!
//! The front end has no ADC: each analog signal feeds a comparator whose
//! other input is a filtered PWM reference. Sweeping the reference and
//! noting where each comparator flips recovers the analog value.

pub mod ramp;

pub use ramp::RampAdc;
