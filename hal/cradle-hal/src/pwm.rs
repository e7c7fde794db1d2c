//! PWM output abstraction
//!
//! The monitor uses PWM twice: as the swept reference voltage for the
//! comparator front end, and as the tone generator for the alarm speaker.
//! Both need control over duty and frequency, which `embedded-hal`'s
//! `SetDutyCycle` does not expose.

/// Duty range of the Raspberry Pi hardware PWM (pigpio `hardware_PWM`).
///
/// A duty of `DEFAULT_DUTY_RANGE` is fully on.
pub const DEFAULT_DUTY_RANGE: u32 = 1_000_000;

/// PWM output channel
pub trait PwmOutput {
    /// Full-scale duty value (100 % on)
    fn duty_range(&self) -> u32 {
        DEFAULT_DUTY_RANGE
    }

    /// Set the duty cycle, in `0..=duty_range()`
    ///
    /// Values above the range are clamped by the implementation.
    fn set_duty(&mut self, duty: u32);

    /// Set the output frequency in Hz
    ///
    /// A frequency of 0 silences the output.
    fn set_frequency(&mut self, hz: u32);
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    fn duty_range(&self) -> u32 {
        (**self).duty_range()
    }

    fn set_duty(&mut self, duty: u32) {
        (**self).set_duty(duty)
    }

    fn set_frequency(&mut self, hz: u32) {
        (**self).set_frequency(hz)
    }
}
