//! Collaborator traits
//!
//! These traits define the interface between the monitoring logic and
//! the hardware-facing drivers.

pub mod alarm;
pub mod sensor;

pub use alarm::AlarmOutput;
pub use sensor::{
    AmbientSensorBus, AmbientSource, AnalogAcquisition, BusError, SensorId, SensorSample,
    MAX_AMBIENT_SENSORS,
};
