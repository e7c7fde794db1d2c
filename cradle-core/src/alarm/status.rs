//! Status and warning derivation

/// Number of warning slots exposed to presentation
pub const WARNING_SLOTS: usize = 5;

/// Fixed-size warning list, indexed by [`WarningSlot`]
pub type WarningVector = [bool; WARNING_SLOTS];

/// Meaning of each warning slot
///
/// Only [`WarningSlot::Temperature`] is driven; the others are reserved for
/// channels the incubator does not measure yet and always read false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WarningSlot {
    /// Skin or ambient temperature out of range
    Temperature = 0,
    /// Relative humidity
    Humidity = 1,
    /// Apnea pad
    Apnea = 2,
    /// Heart rate
    HeartRate = 3,
    /// Blood oxygen saturation
    OxygenSaturation = 4,
}

impl WarningSlot {
    /// Position in the [`WarningVector`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Prioritized caregiver-facing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Skin temperature alarm active (highest priority)
    CheckBabyTemperature,
    /// Incubator air temperature out of range
    CheckIncubatorTemperature,
    /// Nothing to report
    #[default]
    AllClear,
}

impl Status {
    /// Derive the status from the two alarm flags
    pub const fn from_flags(skin_alarm: bool, ambient_alarm: bool) -> Self {
        if skin_alarm {
            Status::CheckBabyTemperature
        } else if ambient_alarm {
            Status::CheckIncubatorTemperature
        } else {
            Status::AllClear
        }
    }

    /// Text shown on the display
    pub const fn message(self) -> &'static str {
        match self {
            Status::CheckBabyTemperature => "Check baby temperature",
            Status::CheckIncubatorTemperature => "Check incubator temperature",
            Status::AllClear => "All clear.",
        }
    }

    /// True unless the status is [`Status::AllClear`]
    pub const fn is_alarm(self) -> bool {
        !matches!(self, Status::AllClear)
    }
}
