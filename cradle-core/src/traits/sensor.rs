//! Temperature acquisition traits

use heapless::Vec;

use crate::reading::{AmbientReading, AnalogReading};

/// Maximum ambient sensors averaged per cycle
pub const MAX_AMBIENT_SENSORS: usize = 8;

/// Errors that can occur while enumerating the ambient sensor bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// No device answered the bus reset
    NoPresence,
    /// Data failed its checksum
    Crc,
    /// Transfer failure on the bus
    Io,
}

/// Identity of one ambient sensor (64-bit 1-Wire ROM code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub u64);

/// One ambient sensor's temperature
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    /// Which sensor produced the value
    pub id: SensorId,
    /// Temperature in degrees Celsius
    pub celsius: f32,
}

/// Digital ambient sensor bus
///
/// Implementations discover whichever sensors are currently present and
/// read each of them.
pub trait AmbientSensorBus {
    /// Read every available sensor into `out`
    ///
    /// `out` is empty on entry. An empty `out` with `Ok(())` means the bus
    /// works but no sensor is present. Sensors beyond capacity are ignored.
    fn read_all(&mut self, out: &mut Vec<SensorSample, MAX_AMBIENT_SENSORS>)
        -> Result<(), BusError>;
}

/// Analog acquisition unit
///
/// Recovers the skin and setpoint temperatures. Never fails: a channel
/// that cannot be read is reported as undetected.
pub trait AnalogAcquisition {
    /// Run one acquisition
    fn acquire(&mut self) -> AnalogReading;
}

/// Source of the reduced ambient temperature
pub trait AmbientSource {
    /// Average every available ambient sensor
    fn average_ambient(&mut self) -> AmbientReading;
}
