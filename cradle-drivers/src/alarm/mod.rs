//! Alarm output implementations

pub mod speaker;

pub use speaker::PwmSpeaker;
