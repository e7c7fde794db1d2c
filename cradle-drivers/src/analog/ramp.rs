//! Comparator ramp ADC
//!
//! Drives the reference PWM from `start_level` upwards in `step`
//! increments. After each change it waits `settle_ms` for the RC filter
//! and comparators, then samples both comparator lines. The first level
//! at which a comparator reads high is converted to a temperature.
//!
//! Conversion time is `step_count × settle_ms` in the worst case (both
//! channels missing); the sweep stops as soon as both have tripped.
//!
//! # Usage
//!
//! ```ignore
//! let mut adc = RampAdc::new(reference_pwm, skin_cmp, setpoint_cmp, delay,
//!                            SweepConfig::default(), ConversionConstants::default());
//! let reading = adc.acquire();
//! if let Some(skin) = reading.skin.value() { /* ... */ }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use cradle_core::config::{ConversionConstants, SweepConfig};
use cradle_core::reading::{AnalogReading, SweepLatch, SweepSample};
use cradle_core::traits::AnalogAcquisition;
use cradle_hal::pwm::PwmOutput;

/// Comparator ramp ADC with two channels
///
/// Channel A reads the skin sensor, channel B the setpoint potentiometer.
pub struct RampAdc<R, A, B, D> {
    reference: R,
    skin_comparator: A,
    setpoint_comparator: B,
    delay: D,
    sweep: SweepConfig,
    conversion: ConversionConstants,
}

impl<R, A, B, D> RampAdc<R, A, B, D>
where
    R: PwmOutput,
    A: InputPin,
    B: InputPin,
{
    /// Create a new ramp ADC
    ///
    /// # Arguments
    /// - `reference`: PWM output feeding the comparators' reference input
    /// - `skin_comparator`: comparator output for the skin sensor
    /// - `setpoint_comparator`: comparator output for the setpoint pot
    /// - `delay`: settle delay provider
    pub fn new(
        reference: R,
        skin_comparator: A,
        setpoint_comparator: B,
        delay: D,
        sweep: SweepConfig,
        conversion: ConversionConstants,
    ) -> Self {
        Self {
            reference,
            skin_comparator,
            setpoint_comparator,
            delay,
            sweep,
            conversion,
        }
    }

    /// Sweep configuration
    pub fn sweep(&self) -> &SweepConfig {
        &self.sweep
    }

    /// Conversion constants
    pub fn conversion(&self) -> &ConversionConstants {
        &self.conversion
    }

    /// Release the underlying peripherals
    pub fn release(self) -> (R, A, B, D) {
        (
            self.reference,
            self.skin_comparator,
            self.setpoint_comparator,
            self.delay,
        )
    }

    fn begin(&mut self) -> SweepLatch {
        self.reference.set_frequency(self.sweep.reference_hz);
        SweepLatch::new(self.conversion)
    }

    fn sample(&mut self, level: u32) -> SweepSample {
        // A failed read counts as "not tripped" at this level
        let channel_a = self.skin_comparator.is_high().unwrap_or_else(|_| {
            warn!("skin comparator read failed at level {}", level);
            false
        });
        let channel_b = self.setpoint_comparator.is_high().unwrap_or_else(|_| {
            warn!("setpoint comparator read failed at level {}", level);
            false
        });

        SweepSample {
            level,
            channel_a,
            channel_b,
        }
    }

    fn finish(latch: SweepLatch) -> AnalogReading {
        let reading = latch.finish();

        if !reading.skin.detected {
            warn!("Unable to read skin sensor");
        }
        if !reading.setpoint.detected {
            warn!("Unable to read setpoint");
        }
        debug!(
            "ramp adc: skin={} setpoint={}",
            reading.skin.celsius, reading.setpoint.celsius
        );

        reading
    }
}

impl<R, A, B, D> RampAdc<R, A, B, D>
where
    R: PwmOutput,
    A: InputPin,
    B: InputPin,
    D: DelayNs,
{
    /// Run one blocking sweep
    pub fn acquire(&mut self) -> AnalogReading {
        let sweep = self.sweep;
        let mut latch = self.begin();

        for level in sweep.levels() {
            self.reference.set_duty(level);
            self.delay.delay_ms(sweep.settle_ms);

            if latch.record(self.sample(level)) {
                break;
            }
        }

        Self::finish(latch)
    }
}

impl<R, A, B, D> RampAdc<R, A, B, D>
where
    R: PwmOutput,
    A: InputPin,
    B: InputPin,
    D: AsyncDelayNs,
{
    /// Run one sweep, yielding to the executor during each settle delay
    ///
    /// Same result as [`RampAdc::acquire`]; intended for a dedicated
    /// acquisition task that hands its reading to the monitor.
    pub async fn acquire_async(&mut self) -> AnalogReading {
        let sweep = self.sweep;
        let mut latch = self.begin();

        for level in sweep.levels() {
            self.reference.set_duty(level);
            self.delay.delay_ms(sweep.settle_ms).await;

            if latch.record(self.sample(level)) {
                break;
            }
        }

        Self::finish(latch)
    }
}

impl<R, A, B, D> AnalogAcquisition for RampAdc<R, A, B, D>
where
    R: PwmOutput,
    A: InputPin,
    B: InputPin,
    D: DelayNs,
{
    fn acquire(&mut self) -> AnalogReading {
        RampAdc::acquire(self)
    }
}
