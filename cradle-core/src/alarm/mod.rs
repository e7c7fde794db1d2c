//! Alarm and snooze handling
//!
//! Turns each cycle's readings plus the mute button into an alarm state,
//! drives the alarm output, and derives the prioritized status shown to
//! caregivers.

pub mod machine;
pub mod status;

pub use machine::{AlarmMachine, AlarmPhase, AlarmState};
pub use status::{Status, WarningSlot, WarningVector, WARNING_SLOTS};
