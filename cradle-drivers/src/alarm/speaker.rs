//! PWM alarm speaker
//!
//! Drives a piezo speaker from a PWM channel at a fixed 50 % duty. The tone
//! is switched by frequency: 0 Hz is silent.

use cradle_core::traits::AlarmOutput;
use cradle_hal::pwm::PwmOutput;

/// Speaker on a PWM output
pub struct PwmSpeaker<P> {
    pwm: P,
    /// Current tone (0 = silent)
    frequency_hz: u32,
}

impl<P: PwmOutput> PwmSpeaker<P> {
    /// Create a new speaker
    ///
    /// The output starts silent.
    pub fn new(mut pwm: P) -> Self {
        let half = pwm.duty_range() / 2;
        pwm.set_duty(half);
        pwm.set_frequency(0);
        Self {
            pwm,
            frequency_hz: 0,
        }
    }

    /// Current tone frequency (0 when silent)
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Get access to the underlying PWM channel
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

impl<P: PwmOutput> AlarmOutput for PwmSpeaker<P> {
    fn sound(&mut self, frequency_hz: u32) {
        self.frequency_hz = frequency_hz;
        self.pwm.set_frequency(frequency_hz);
    }

    fn silence(&mut self) {
        self.frequency_hz = 0;
        self.pwm.set_frequency(0);
    }

    fn is_sounding(&self) -> bool {
        self.frequency_hz != 0
    }
}
