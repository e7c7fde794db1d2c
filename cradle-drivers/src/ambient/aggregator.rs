//! Ambient aggregator
//!
//! Reduces however many ambient sensors answered this cycle to a single
//! mean. Bus failures are logged and reported as a value, never
//! propagated: the monitoring loop must keep running.

use heapless::Vec;

use cradle_core::reading::AmbientReading;
use cradle_core::traits::{AmbientSensorBus, AmbientSource, SensorSample, MAX_AMBIENT_SENSORS};

/// Averages every sensor on an ambient bus
pub struct AmbientAggregator<B> {
    bus: B,
    /// Samples from the latest cycle
    samples: Vec<SensorSample, MAX_AMBIENT_SENSORS>,
}

impl<B: AmbientSensorBus> AmbientAggregator<B> {
    /// Create a new aggregator
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            samples: Vec::new(),
        }
    }

    /// Query the bus and average the readings
    ///
    /// Returns [`AmbientReading::NoSensors`] for an empty bus and
    /// [`AmbientReading::BusFault`] if the bus could not be read.
    pub fn average_ambient(&mut self) -> AmbientReading {
        self.samples.clear();

        if let Err(err) = self.bus.read_all(&mut self.samples) {
            warn!("ambient bus read failed: {}", err);
            // Drop anything read before the failure
            self.samples.clear();
            return AmbientReading::BusFault(err);
        }

        let reading = AmbientReading::from_samples(self.samples.iter().map(|s| s.celsius));
        if reading == AmbientReading::NoSensors {
            debug!("no ambient sensors present");
        }
        reading
    }

    /// Per-sensor samples from the latest cycle
    pub fn samples(&self) -> &[SensorSample] {
        &self.samples
    }

    /// Get access to the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: AmbientSensorBus> AmbientSource for AmbientAggregator<B> {
    fn average_ambient(&mut self) -> AmbientReading {
        AmbientAggregator::average_ambient(self)
    }
}
