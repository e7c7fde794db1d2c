//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sweep range contains no levels (start >= end)
    EmptySweep,
    /// Sweep step is zero
    ZeroStep,
    /// Sweep end exceeds the PWM duty range
    SweepBeyondRange,
    /// A temperature band has min > max
    InvertedBand,
    /// Alarm tone frequency is zero (would be silent)
    ZeroTone,
    /// Conversion duty range is zero
    ZeroDutyRange,
}

/// Reference sweep parameters for the comparator front end
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SweepConfig {
    /// First duty level driven
    pub start_level: u32,
    /// End of the sweep (exclusive)
    pub end_level: u32,
    /// Duty increment per step
    pub step: u32,
    /// Wait after each duty change before sampling (ms)
    pub settle_ms: u32,
    /// Reference PWM carrier frequency (Hz)
    pub reference_hz: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        // 0.7 V .. 0.95 V covers 20 °C .. 45 °C on an LM35-style sensor
        // with 0.5 V offset.
        Self {
            start_level: 212_000,
            end_level: 288_000,
            step: 1_000,
            settle_ms: 30,
            reference_hz: 100_000,
        }
    }
}

impl SweepConfig {
    /// Create a sweep configuration
    pub const fn new(start_level: u32, end_level: u32, step: u32, settle_ms: u32) -> Self {
        Self {
            start_level,
            end_level,
            step,
            settle_ms,
            reference_hz: 100_000,
        }
    }

    /// Number of levels visited by a full sweep
    pub fn step_count(&self) -> u32 {
        if self.step == 0 || self.start_level >= self.end_level {
            return 0;
        }
        (self.end_level - self.start_level).div_ceil(self.step)
    }

    /// Upper bound on the time one acquisition blocks (ms)
    pub fn worst_case_ms(&self) -> u32 {
        self.step_count().saturating_mul(self.settle_ms)
    }

    /// Iterate the duty levels of one sweep in increasing order
    pub fn levels(&self) -> impl Iterator<Item = u32> {
        // step_by panics on 0; an invalid config yields an empty sweep
        let (start, end) = if self.step == 0 {
            (0, 0)
        } else {
            (self.start_level, self.end_level)
        };
        (start..end).step_by(self.step.max(1) as usize)
    }

    /// Check the sweep against the PWM duty range
    pub fn validate(&self, duty_range: u32) -> Result<(), ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.start_level >= self.end_level {
            return Err(ConfigError::EmptySweep);
        }
        if self.end_level > duty_range.saturating_add(1) {
            return Err(ConfigError::SweepBeyondRange);
        }
        Ok(())
    }
}

/// Constants mapping a sweep level to degrees Celsius
///
/// `celsius = (supply_voltage * level / duty_range - offset) * scale`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionConstants {
    /// Reference supply voltage (V)
    pub supply_voltage: f32,
    /// Sensor output at 0 °C (V)
    pub offset: f32,
    /// Degrees per volt
    pub scale: f32,
    /// Duty level corresponding to the full supply voltage
    pub duty_range: u32,
}

impl Default for ConversionConstants {
    fn default() -> Self {
        Self {
            supply_voltage: 3.3,
            offset: 0.5,
            scale: 100.0,
            duty_range: 1_000_000,
        }
    }
}

impl ConversionConstants {
    /// Convert a sweep level to degrees Celsius
    pub fn level_to_celsius(&self, level: u32) -> f32 {
        let volts = self.supply_voltage * (level as f32 / self.duty_range as f32);
        (volts - self.offset) * self.scale
    }

    /// Check the constants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duty_range == 0 {
            return Err(ConfigError::ZeroDutyRange);
        }
        Ok(())
    }
}

/// Inclusive safe temperature band
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemperatureBand {
    /// Lowest safe temperature (°C)
    pub min_c: f32,
    /// Highest safe temperature (°C)
    pub max_c: f32,
}

impl TemperatureBand {
    /// Create a band
    pub const fn new(min_c: f32, max_c: f32) -> Self {
        Self { min_c, max_c }
    }

    /// True if `celsius` is strictly below `min_c` or strictly above `max_c`
    pub fn is_outside(&self, celsius: f32) -> bool {
        celsius < self.min_c || celsius > self.max_c
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_c > self.max_c {
            return Err(ConfigError::InvertedBand);
        }
        Ok(())
    }
}

/// Alarm thresholds and timing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlarmConfig {
    /// Safe skin temperature band
    pub skin: TemperatureBand,
    /// Safe incubator air temperature band
    pub ambient: TemperatureBand,
    /// How long a mute press suppresses the skin alarm (ms)
    pub snooze_ms: u32,
    /// Speaker tone while alarming (Hz)
    pub tone_hz: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            skin: TemperatureBand::new(36.0, 38.0),
            ambient: TemperatureBand::new(28.0, 38.0),
            snooze_ms: 120_000,
            tone_hz: 5_000,
        }
    }
}

impl AlarmConfig {
    /// Check the thresholds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.skin.validate()?;
        self.ambient.validate()?;
        if self.tone_hz == 0 {
            return Err(ConfigError::ZeroTone);
        }
        Ok(())
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonitorConfig {
    /// Reference sweep
    pub sweep: SweepConfig,
    /// Level-to-temperature conversion
    pub conversion: ConversionConstants,
    /// Alarm thresholds
    pub alarm: AlarmConfig,
}

impl MonitorConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.conversion.validate()?;
        self.sweep.validate(self.conversion.duty_range)?;
        self.alarm.validate()
    }
}
