//! TSC-backed kernel clock.

use quanta::Clock;

/// Low-overhead clock for timing kernel calls.
#[derive(Clone, Debug)]
pub struct KernelClock {
    clock: Clock,
}

impl KernelClock {
    pub fn new() -> Self {
        Self { clock: Clock::new() }
    }

    /// Wrap an existing clock (e.g. a mocked one).
    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    /// Get current raw timestamp.
    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.clock.raw()
    }

    /// Convert two raw timestamps to elapsed nanoseconds.
    #[inline(always)]
    pub fn delta_as_nanos(&self, start: u64, end: u64) -> u64 {
        self.clock.delta_as_nanos(start, end)
    }

    /// Run `f` and return its result with the elapsed nanoseconds.
    #[inline]
    pub fn time<R>(&self, f: impl FnOnce() -> R) -> (R, u64) {
        let start = self.now();
        let result = f();
        let end = self.now();
        (result, self.delta_as_nanos(start, end))
    }
}

impl Default for KernelClock {
    fn default() -> Self {
        Self::new()
    }
}
