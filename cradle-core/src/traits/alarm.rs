//! Alarm output trait

/// Audible alarm output
///
/// Implementations drive a speaker or buzzer, typically with PWM.
pub trait AlarmOutput {
    /// Start sounding at `frequency_hz`
    fn sound(&mut self, frequency_hz: u32);

    /// Stop sounding
    fn silence(&mut self);

    /// Check if the alarm is currently sounding
    fn is_sounding(&self) -> bool;
}

impl<T: AlarmOutput + ?Sized> AlarmOutput for &mut T {
    fn sound(&mut self, frequency_hz: u32) {
        (**self).sound(frequency_hz)
    }

    fn silence(&mut self) {
        (**self).silence()
    }

    fn is_sounding(&self) -> bool {
        (**self).is_sounding()
    }
}
