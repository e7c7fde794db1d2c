//! Alarm state machine
//!
//! The skin channel has three phases:
//!
//! ```text
//!            out of range             mute pressed
//!   Clear ────────────────► SkinAlarm ────────────► Snoozed
//!     ▲                        │  ▲                    │
//!     └──── back in range ─────┘  └── snooze expired ──┘
//!                                     and still out of range
//! ```
//!
//! The ambient alarm is an orthogonal flag with no snooze path.

use crate::alarm::status::{Status, WarningSlot, WarningVector, WARNING_SLOTS};
use crate::config::AlarmConfig;
use crate::reading::{AmbientReading, AnalogReading};
use crate::traits::AlarmOutput;

/// Skin channel phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmPhase {
    /// No skin alarm and no snooze pending
    #[default]
    Clear,
    /// Speaker driven
    SkinAlarm,
    /// Alarm muted, countdown running
    Snoozed,
}

/// Alarm flags
///
/// Invariant: `snooze_active` implies `!skin_alarm_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmState {
    /// Skin temperature alarm sounding
    pub skin_alarm_active: bool,
    /// Ambient temperature out of range
    pub ambient_alarm_active: bool,
    /// Skin alarm muted by the caregiver
    pub snooze_active: bool,
    /// When the current snooze started (ms)
    pub snooze_started_ms: u32,
}

impl AlarmState {
    /// Skin channel phase derived from the flags
    pub fn phase(&self) -> AlarmPhase {
        if self.skin_alarm_active {
            AlarmPhase::SkinAlarm
        } else if self.snooze_active {
            AlarmPhase::Snoozed
        } else {
            AlarmPhase::Clear
        }
    }
}

/// Alarm state machine
///
/// Owns the [`AlarmState`] for the lifetime of the process. Updated once
/// per monitoring cycle; the alarm output is passed in by the caller.
#[derive(Debug, Clone)]
pub struct AlarmMachine {
    config: AlarmConfig,
    state: AlarmState,
    /// Consecutive cycles without a skin reading
    missed_skin_cycles: u32,
}

impl Default for AlarmMachine {
    fn default() -> Self {
        Self::new(AlarmConfig::default())
    }
}

impl AlarmMachine {
    /// Create a machine in the clear state
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            state: AlarmState::default(),
            missed_skin_cycles: 0,
        }
    }

    /// Process one monitoring cycle
    ///
    /// # Arguments
    /// - `reading`: latest analog acquisition
    /// - `ambient`: latest ambient average
    /// - `mute`: mute button asserted this cycle
    /// - `now_ms`: monotonic timestamp of this cycle
    /// - `output`: alarm speaker
    pub fn update<O: AlarmOutput + ?Sized>(
        &mut self,
        reading: &AnalogReading,
        ambient: &AmbientReading,
        mute: bool,
        now_ms: u32,
        output: &mut O,
    ) {
        // An unavailable ambient average never trips the alarm
        self.state.ambient_alarm_active = ambient
            .celsius()
            .is_some_and(|t| self.config.ambient.is_outside(t));

        if mute && self.state.skin_alarm_active && !self.state.snooze_active {
            self.state.snooze_active = true;
            self.state.skin_alarm_active = false;
            output.silence();
            self.state.snooze_started_ms = now_ms;
        }

        let Some(skin_c) = reading.skin.value() else {
            // Missed cycle: keep the previous decision
            self.missed_skin_cycles = self.missed_skin_cycles.saturating_add(1);
            return;
        };
        self.missed_skin_cycles = 0;

        if self.config.skin.is_outside(skin_c) {
            if !self.state.skin_alarm_active
                && (!self.state.snooze_active || self.snooze_expired(now_ms))
            {
                self.state.snooze_active = false;
                self.state.skin_alarm_active = true;
                output.sound(self.config.tone_hz);
            }
        } else {
            // snooze_active is left untouched
            self.state.skin_alarm_active = false;
            output.silence();
        }
    }

    fn snooze_expired(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.state.snooze_started_ms) >= self.config.snooze_ms
    }

    /// Prioritized status from the latest update
    pub fn status(&self) -> Status {
        Status::from_flags(self.state.skin_alarm_active, self.state.ambient_alarm_active)
    }

    /// Warning vector from the latest update
    pub fn warnings(&self) -> WarningVector {
        let mut warnings = [false; WARNING_SLOTS];
        warnings[WarningSlot::Temperature.index()] =
            self.state.skin_alarm_active || self.state.ambient_alarm_active;
        warnings
    }

    /// Current flags
    pub fn state(&self) -> &AlarmState {
        &self.state
    }

    /// Current skin channel phase
    pub fn phase(&self) -> AlarmPhase {
        self.state.phase()
    }

    /// Consecutive cycles in which the skin comparator never tripped
    pub fn missed_skin_cycles(&self) -> u32 {
        self.missed_skin_cycles
    }

    /// Active configuration
    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::ChannelReading;
    use crate::traits::BusError;
    use proptest::prelude::*;

    const SNOOZE_MS: u32 = 120_000;

    // Mock speaker recording every command
    #[derive(Default)]
    struct MockSpeaker {
        frequency_hz: u32,
        sound_calls: u32,
        silence_calls: u32,
    }

    impl AlarmOutput for MockSpeaker {
        fn sound(&mut self, frequency_hz: u32) {
            self.frequency_hz = frequency_hz;
            self.sound_calls += 1;
        }

        fn silence(&mut self) {
            self.frequency_hz = 0;
            self.silence_calls += 1;
        }

        fn is_sounding(&self) -> bool {
            self.frequency_hz != 0
        }
    }

    fn skin(celsius: f32) -> AnalogReading {
        AnalogReading::new(celsius, 37.0)
    }

    fn ambient(celsius: f32) -> AmbientReading {
        AmbientReading::Average {
            celsius,
            sensors: 1,
        }
    }

    fn machine() -> AlarmMachine {
        AlarmMachine::new(AlarmConfig::default())
    }

    #[test]
    fn test_initial_state_is_clear() {
        let machine = machine();
        assert_eq!(machine.phase(), AlarmPhase::Clear);
        assert_eq!(machine.status(), Status::AllClear);
        assert_eq!(machine.warnings(), [false; WARNING_SLOTS]);
    }

    #[test]
    fn test_alarm_activation() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);

        assert!(machine.state().skin_alarm_active);
        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
        assert!(speaker.is_sounding());
        assert_eq!(speaker.frequency_hz, 5_000);
        assert_eq!(machine.status(), Status::CheckBabyTemperature);
        assert!(machine.warnings()[0]);
    }

    #[test]
    fn test_low_skin_temperature_alarms() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();
        machine.update(&skin(35.0), &ambient(33.0), false, 0, &mut speaker);
        assert!(machine.state().skin_alarm_active);
    }

    #[test]
    fn test_alarm_not_retriggered_while_active() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        for t in 0..5 {
            machine.update(&skin(39.5), &ambient(33.0), false, t * 1_000, &mut speaker);
        }

        assert_eq!(speaker.sound_calls, 1);
    }

    #[test]
    fn test_snooze_suppression_then_expiry() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 1_000, &mut speaker);
        assert!(speaker.is_sounding());

        // Mute pressed while alarming
        machine.update(&skin(39.5), &ambient(33.0), true, 2_000, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::Snoozed);
        assert!(!machine.state().skin_alarm_active);
        assert_eq!(machine.state().snooze_started_ms, 2_000);
        assert!(!speaker.is_sounding());

        // Just before the window closes
        machine.update(
            &skin(39.5),
            &ambient(33.0),
            false,
            2_000 + SNOOZE_MS - 1,
            &mut speaker,
        );
        assert_eq!(machine.phase(), AlarmPhase::Snoozed);
        assert!(!speaker.is_sounding());

        // Just after
        machine.update(
            &skin(39.5),
            &ambient(33.0),
            false,
            2_000 + SNOOZE_MS + 1,
            &mut speaker,
        );
        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
        assert!(!machine.state().snooze_active);
        assert!(speaker.is_sounding());
    }

    #[test]
    fn test_snooze_expires_exactly_at_length() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), true, 0, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), false, SNOOZE_MS, &mut speaker);

        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
    }

    #[test]
    fn test_snooze_survives_clock_wrap() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();
        let start = u32::MAX - 10;

        machine.update(&skin(39.5), &ambient(33.0), false, start, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), true, start, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), false, 100, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::Snoozed);

        let expiry = start.wrapping_add(SNOOZE_MS);
        machine.update(&skin(39.5), &ambient(33.0), false, expiry, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
    }

    #[test]
    fn test_mute_without_alarm_does_nothing() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(37.0), &ambient(33.0), true, 0, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::Clear);
        assert!(!machine.state().snooze_active);

        // An alarm right after a stray press still sounds
        machine.update(&skin(39.5), &ambient(33.0), false, 10, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
    }

    #[test]
    fn test_holding_mute_does_not_restart_snooze() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), true, 1_000, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), true, 50_000, &mut speaker);

        assert_eq!(machine.state().snooze_started_ms, 1_000);
    }

    #[test]
    fn test_clear_keeps_stale_snooze_flag() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);
        machine.update(&skin(39.5), &ambient(33.0), true, 1_000, &mut speaker);
        machine.update(&skin(37.0), &ambient(33.0), false, 2_000, &mut speaker);

        assert!(!machine.state().skin_alarm_active);
        assert!(machine.state().snooze_active);
        assert_eq!(machine.phase(), AlarmPhase::Snoozed);
        assert_eq!(machine.status(), Status::AllClear);

        // A new excursion inside the old window stays silent
        machine.update(&skin(39.5), &ambient(33.0), false, 3_000, &mut speaker);
        assert!(!speaker.is_sounding());
    }

    #[test]
    fn test_priority_ordering() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(45.0), false, 0, &mut speaker);

        assert!(machine.state().skin_alarm_active);
        assert!(machine.state().ambient_alarm_active);
        assert_eq!(machine.status(), Status::CheckBabyTemperature);
    }

    #[test]
    fn test_ambient_alarm_alone() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(37.0), &ambient(20.0), false, 0, &mut speaker);

        assert_eq!(machine.status(), Status::CheckIncubatorTemperature);
        assert_eq!(machine.warnings(), [true, false, false, false, false]);
        // The ambient channel does not drive the speaker
        assert!(!speaker.is_sounding());
    }

    #[test]
    fn test_unavailable_ambient_never_alarms() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(37.0), &AmbientReading::NoSensors, false, 0, &mut speaker);
        assert!(!machine.state().ambient_alarm_active);

        machine.update(
            &skin(37.0),
            &AmbientReading::BusFault(BusError::Io),
            false,
            1,
            &mut speaker,
        );
        assert!(!machine.state().ambient_alarm_active);
        assert_eq!(machine.status(), Status::AllClear);
    }

    #[test]
    fn test_clear_state_is_idempotent() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        for t in 0..100 {
            machine.update(&skin(37.0), &ambient(33.0), false, t * 500, &mut speaker);
            assert_eq!(machine.phase(), AlarmPhase::Clear);
            assert_eq!(machine.status(), Status::AllClear);
            assert!(!speaker.is_sounding());
        }
        assert_eq!(speaker.sound_calls, 0);
    }

    #[test]
    fn test_return_to_range_silences() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);
        machine.update(&skin(37.5), &ambient(33.0), false, 1_000, &mut speaker);

        assert_eq!(machine.phase(), AlarmPhase::Clear);
        assert!(!speaker.is_sounding());
    }

    #[test]
    fn test_undetected_skin_is_missed_cycle() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();
        let undetected = AnalogReading {
            skin: ChannelReading::UNDETECTED,
            setpoint: ChannelReading::detected(37.0),
        };

        // 0.0 would be out of range, but it is not a real reading
        machine.update(&undetected, &ambient(33.0), false, 0, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::Clear);
        assert_eq!(machine.missed_skin_cycles(), 1);

        // An alarm already sounding keeps sounding through missed cycles
        machine.update(&skin(39.5), &ambient(33.0), false, 1_000, &mut speaker);
        assert_eq!(machine.missed_skin_cycles(), 0);
        machine.update(&undetected, &ambient(33.0), false, 2_000, &mut speaker);
        machine.update(&undetected, &ambient(33.0), false, 3_000, &mut speaker);
        assert_eq!(machine.phase(), AlarmPhase::SkinAlarm);
        assert!(speaker.is_sounding());
        assert_eq!(machine.missed_skin_cycles(), 2);
    }

    #[test]
    fn test_mute_applies_on_missed_cycle() {
        let mut machine = machine();
        let mut speaker = MockSpeaker::default();

        machine.update(&skin(39.5), &ambient(33.0), false, 0, &mut speaker);
        machine.update(&AnalogReading::default(), &ambient(33.0), true, 500, &mut speaker);

        assert_eq!(machine.phase(), AlarmPhase::Snoozed);
        assert!(!speaker.is_sounding());
    }

    proptest! {
        #[test]
        fn snooze_and_skin_alarm_are_exclusive(
            steps in proptest::collection::vec(
                (30.0f32..45.0, any::<bool>(), any::<bool>(), 0u32..200_000),
                1..64,
            )
        ) {
            let mut machine = machine();
            let mut speaker = MockSpeaker::default();
            let mut now = 0u32;

            for (skin_c, detected, mute, dt) in steps {
                now = now.wrapping_add(dt);
                let reading = AnalogReading {
                    skin: if detected {
                        ChannelReading::detected(skin_c)
                    } else {
                        ChannelReading::UNDETECTED
                    },
                    setpoint: ChannelReading::UNDETECTED,
                };
                machine.update(&reading, &ambient(33.0), mute, now, &mut speaker);

                let state = machine.state();
                prop_assert!(!(state.snooze_active && state.skin_alarm_active));
                prop_assert_eq!(speaker.is_sounding(), state.skin_alarm_active);
            }
        }

        #[test]
        fn sentinel_ambient_never_alarms(skin_c in 36.0f32..=38.0) {
            let mut machine = machine();
            let mut speaker = MockSpeaker::default();
            let sentinel = AmbientReading::from_samples(core::iter::empty());
            machine.update(&skin(skin_c), &sentinel, false, 0, &mut speaker);
            prop_assert_eq!(machine.status(), Status::AllClear);
        }
    }
}
