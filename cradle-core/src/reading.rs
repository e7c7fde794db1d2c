//! Sensor reading types
//!
//! Values produced once per monitoring cycle by the acquisition side and
//! consumed by the alarm state machine. None of them are retained across
//! cycles.

use crate::config::ConversionConstants;
use crate::traits::BusError;

/// Value reported for a comparator channel that never tripped
pub const UNDETECTED_CELSIUS: f32 = 0.0;

/// Legacy ambient value when no average is available
pub const AMBIENT_UNAVAILABLE: f32 = -1.0;

/// One comparator channel's result for a single sweep
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelReading {
    /// Latched temperature, or [`UNDETECTED_CELSIUS`] if not detected
    pub celsius: f32,
    /// Whether the comparator tripped during the sweep
    pub detected: bool,
}

impl ChannelReading {
    /// A channel whose comparator never tripped
    pub const UNDETECTED: Self = Self {
        celsius: UNDETECTED_CELSIUS,
        detected: false,
    };

    /// A channel latched at `celsius`
    pub const fn detected(celsius: f32) -> Self {
        Self {
            celsius,
            detected: true,
        }
    }

    /// Temperature if the channel was detected
    pub fn value(&self) -> Option<f32> {
        self.detected.then_some(self.celsius)
    }
}

impl Default for ChannelReading {
    fn default() -> Self {
        Self::UNDETECTED
    }
}

/// Result of one analog acquisition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogReading {
    /// Infant skin temperature (comparator channel A)
    pub skin: ChannelReading,
    /// Caregiver setpoint (comparator channel B)
    pub setpoint: ChannelReading,
}

impl AnalogReading {
    /// Create a reading with both channels detected
    pub const fn new(skin_c: f32, setpoint_c: f32) -> Self {
        Self {
            skin: ChannelReading::detected(skin_c),
            setpoint: ChannelReading::detected(setpoint_c),
        }
    }

    /// True if both comparators tripped
    pub fn is_complete(&self) -> bool {
        self.skin.detected && self.setpoint.detected
    }
}

/// One sweep step: the driven level and both comparator outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepSample {
    /// Duty level driven on the reference
    pub level: u32,
    /// Skin comparator output
    pub channel_a: bool,
    /// Setpoint comparator output
    pub channel_b: bool,
}

/// First-trip latch for a comparator sweep
///
/// Fed one [`SweepSample`] per step in increasing level order. Each channel
/// latches the temperature of the first step at which its comparator reads
/// high; later steps never overwrite it.
#[derive(Debug, Clone, Copy)]
pub struct SweepLatch {
    conversion: ConversionConstants,
    reading: AnalogReading,
}

impl SweepLatch {
    /// Start a new sweep
    pub fn new(conversion: ConversionConstants) -> Self {
        Self {
            conversion,
            reading: AnalogReading::default(),
        }
    }

    /// Record one step
    ///
    /// Returns `true` once both channels have latched and the sweep can
    /// stop early.
    pub fn record(&mut self, sample: SweepSample) -> bool {
        if sample.channel_a && !self.reading.skin.detected {
            self.reading.skin = ChannelReading::detected(self.conversion.level_to_celsius(sample.level));
        }
        if sample.channel_b && !self.reading.setpoint.detected {
            self.reading.setpoint =
                ChannelReading::detected(self.conversion.level_to_celsius(sample.level));
        }
        self.is_done()
    }

    /// True once both channels have latched
    pub fn is_done(&self) -> bool {
        self.reading.is_complete()
    }

    /// Finish the sweep
    pub fn finish(self) -> AnalogReading {
        self.reading
    }
}

/// Reduced ambient temperature for one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AmbientReading {
    /// Mean of every sensor that answered
    Average {
        /// Arithmetic mean (°C)
        celsius: f32,
        /// Number of sensors averaged
        sensors: u8,
    },
    /// The bus answered but no sensor is present
    NoSensors,
    /// The bus could not be enumerated this cycle
    BusFault(BusError),
}

impl AmbientReading {
    /// Mean temperature, if any sensor answered
    pub fn celsius(&self) -> Option<f32> {
        match self {
            AmbientReading::Average { celsius, .. } => Some(*celsius),
            AmbientReading::NoSensors | AmbientReading::BusFault(_) => None,
        }
    }

    /// Mean temperature, or [`AMBIENT_UNAVAILABLE`]
    pub fn as_sentinel(&self) -> f32 {
        self.celsius().unwrap_or(AMBIENT_UNAVAILABLE)
    }

    /// Average a set of readings
    pub fn from_samples(values: impl IntoIterator<Item = f32>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0.0f32, 0u32), |(sum, count), v| (sum + v, count + 1));

        if count == 0 {
            return AmbientReading::NoSensors;
        }

        AmbientReading::Average {
            celsius: sum / count as f32,
            sensors: count.min(u8::MAX as u32) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(level: u32, a: bool, b: bool) -> SweepSample {
        SweepSample {
            level,
            channel_a: a,
            channel_b: b,
        }
    }

    #[test]
    fn test_first_trip_wins() {
        let conv = ConversionConstants::default();
        let mut latch = SweepLatch::new(conv);

        assert!(!latch.record(sample(250_000, false, false)));
        assert!(!latch.record(sample(251_000, true, false)));
        assert!(!latch.record(sample(252_000, true, false)));
        assert!(latch.record(sample(253_000, true, true)));

        let reading = latch.finish();
        assert_eq!(reading.skin.celsius, conv.level_to_celsius(251_000));
        assert_eq!(reading.setpoint.celsius, conv.level_to_celsius(253_000));
        assert!(reading.is_complete());
    }

    #[test]
    fn test_same_step_trips_both() {
        let conv = ConversionConstants::default();
        let mut latch = SweepLatch::new(conv);
        assert!(latch.record(sample(260_000, true, true)));
        let reading = latch.finish();
        assert_eq!(reading.skin, reading.setpoint);
    }

    #[test]
    fn test_untripped_channel_stays_undetected() {
        let mut latch = SweepLatch::new(ConversionConstants::default());
        latch.record(sample(250_000, false, true));
        latch.record(sample(251_000, false, true));
        let reading = latch.finish();

        assert_eq!(reading.skin, ChannelReading::UNDETECTED);
        assert_eq!(reading.skin.value(), None);
        assert_eq!(reading.skin.celsius, UNDETECTED_CELSIUS);
        assert!(reading.setpoint.value().is_some());
    }

    #[test]
    fn test_ambient_average() {
        let reading = AmbientReading::from_samples([36.0, 38.0]);
        assert_eq!(
            reading,
            AmbientReading::Average {
                celsius: 37.0,
                sensors: 2
            }
        );
        assert_eq!(reading.as_sentinel(), 37.0);
    }

    #[test]
    fn test_ambient_empty_is_sentinel() {
        let reading = AmbientReading::from_samples(core::iter::empty());
        assert_eq!(reading, AmbientReading::NoSensors);
        assert_eq!(reading.celsius(), None);
        assert_eq!(reading.as_sentinel(), AMBIENT_UNAVAILABLE);
    }

    #[test]
    fn test_bus_fault_is_sentinel() {
        let reading = AmbientReading::BusFault(BusError::NoPresence);
        assert_eq!(reading.as_sentinel(), -1.0);
    }

    proptest! {
        #[test]
        fn conversion_is_monotonic(a in 0u32..=1_000_000, b in 0u32..=1_000_000) {
            let conv = ConversionConstants::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(conv.level_to_celsius(lo) <= conv.level_to_celsius(hi));
        }

        #[test]
        fn latch_never_moves_after_first_trip(
            trip in 0usize..50,
            extra in proptest::collection::vec(any::<bool>(), 0..50),
        ) {
            let conv = ConversionConstants::default();
            let mut latch = SweepLatch::new(conv);
            for i in 0..trip {
                latch.record(sample(200_000 + i as u32 * 1_000, false, false));
            }
            let trip_level = 200_000 + trip as u32 * 1_000;
            latch.record(sample(trip_level, true, false));
            for (i, a) in extra.iter().enumerate() {
                latch.record(sample(trip_level + (i as u32 + 1) * 1_000, *a, false));
            }
            let reading = latch.finish();
            prop_assert_eq!(reading.skin.value(), Some(conv.level_to_celsius(trip_level)));
            prop_assert!(!reading.setpoint.detected);
        }
    }
}
