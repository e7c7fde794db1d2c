//! Configuration types
//!
//! Deployment constants for the sweep, the conversion formula and the
//! alarm thresholds. Values are fixed per deployment; nothing here is
//! loaded or persisted at runtime.

pub mod types;

pub use types::*;
