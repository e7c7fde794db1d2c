//! Monotonic time source

/// Monotonic millisecond clock
///
/// The counter may wrap; consumers compute elapsed time with
/// `wrapping_sub`, so a wrap is harmless as long as intervals stay below
/// ~49 days.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch (typically boot)
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `earlier_ms`
    fn elapsed_since(&self, earlier_ms: u32) -> u32 {
        self.now_ms().wrapping_sub(earlier_ms)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
