//! Incubator monitor
//!
//! Runs one monitoring cycle per call, strictly in order:
//!
//! 1. Analog acquisition (skin + setpoint)
//! 2. Ambient aggregation
//! 3. Mute button and clock sampling
//! 4. Alarm state update (drives the speaker)
//!
//! The monitor owns every component; nothing is shared, so no locking is
//! needed. The caller decides the cycle period.

use embedded_hal::digital::InputPin;

use cradle_core::alarm::{AlarmMachine, AlarmPhase, Status, WarningVector};
use cradle_core::config::AlarmConfig;
use cradle_core::reading::{AmbientReading, AnalogReading};
use cradle_core::traits::{AlarmOutput, AmbientSource, AnalogAcquisition};
use cradle_hal::time::Clock;

/// Outcome of one monitoring cycle, for presentation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Skin and setpoint temperatures
    pub reading: AnalogReading,
    /// Ambient average
    pub ambient: AmbientReading,
    /// Mute button state sampled this cycle
    pub mute: bool,
    /// Skin channel phase after the update
    pub phase: AlarmPhase,
    /// Prioritized status
    pub status: Status,
    /// Warning vector
    pub warnings: WarningVector,
    /// Cycle timestamp (ms)
    pub now_ms: u32,
}

/// Monitoring loop body
///
/// # Type parameters
/// - `A`: analog acquisition unit (usually [`crate::analog::RampAdc`])
/// - `S`: ambient source (usually [`crate::ambient::AmbientAggregator`])
/// - `M`: mute button, active high
/// - `O`: alarm output (usually [`crate::alarm::PwmSpeaker`])
/// - `C`: monotonic clock
pub struct IncubatorMonitor<A, S, M, O, C> {
    analog: A,
    ambient: S,
    mute: M,
    output: O,
    clock: C,
    alarm: AlarmMachine,
}

impl<A, S, M, O, C> IncubatorMonitor<A, S, M, O, C>
where
    A: AnalogAcquisition,
    S: AmbientSource,
    M: InputPin,
    O: AlarmOutput,
    C: Clock,
{
    /// Create a new monitor in the clear state
    pub fn new(analog: A, ambient: S, mute: M, mut output: O, clock: C, config: AlarmConfig) -> Self {
        output.silence();
        info!(
            "monitor: skin {}..{} C, ambient {}..{} C, snooze {} ms",
            config.skin.min_c,
            config.skin.max_c,
            config.ambient.min_c,
            config.ambient.max_c,
            config.snooze_ms
        );
        Self {
            analog,
            ambient,
            mute,
            output,
            clock,
            alarm: AlarmMachine::new(config),
        }
    }

    /// Run one monitoring cycle
    pub fn cycle(&mut self) -> CycleReport {
        let reading = self.analog.acquire();
        let ambient = self.ambient.average_ambient();

        let mute = self.mute.is_high().unwrap_or_else(|_| {
            warn!("mute button read failed");
            false
        });
        let now_ms = self.clock.now_ms();

        let before = self.alarm.phase();
        self.alarm
            .update(&reading, &ambient, mute, now_ms, &mut self.output);
        let phase = self.alarm.phase();

        if phase != before {
            info!("alarm: {} -> {}", before, phase);
        }
        if !reading.skin.detected {
            warn!(
                "skin reading missing for {} cycle(s)",
                self.alarm.missed_skin_cycles()
            );
        }

        CycleReport {
            reading,
            ambient,
            mute,
            phase,
            status: self.alarm.status(),
            warnings: self.alarm.warnings(),
            now_ms,
        }
    }

    /// Status from the latest cycle
    pub fn status(&self) -> Status {
        self.alarm.status()
    }

    /// Warning vector from the latest cycle
    pub fn warnings(&self) -> WarningVector {
        self.alarm.warnings()
    }

    /// Alarm state machine
    pub fn alarm(&self) -> &AlarmMachine {
        &self.alarm
    }

    /// Get access to the alarm output
    pub fn output(&self) -> &O {
        &self.output
    }
}
