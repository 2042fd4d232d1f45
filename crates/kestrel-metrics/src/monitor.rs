//! Timed kernel calls.
//!
//! [`KernelMonitor`] wraps a kernel call with the clock and feeds both the
//! shared counters and a per-kind latency histogram.

use crate::clock::KernelClock;
use crate::histogram::{LatencyHistogram, MetricsError};
use crate::stats::{KernelKind, KernelStats};

/// Clock, counters and one histogram per [`KernelKind`].
#[derive(Debug)]
pub struct KernelMonitor {
    clock: KernelClock,
    stats: KernelStats,
    histograms: [LatencyHistogram; 3],
}

impl KernelMonitor {
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_clock(KernelClock::new())
    }

    pub fn with_clock(clock: KernelClock) -> Result<Self, MetricsError> {
        Ok(Self {
            clock,
            stats: KernelStats::new(),
            histograms: [
                LatencyHistogram::new()?,
                LatencyHistogram::new()?,
                LatencyHistogram::new()?,
            ],
        })
    }

    /// Run one kernel call and record its latency under `kind`.
    #[inline]
    pub fn time<R>(&mut self, kind: KernelKind, f: impl FnOnce() -> R) -> R {
        let (result, nanos) = self.clock.time(f);
        self.record(kind, nanos);
        result
    }

    /// Record an externally measured call.
    #[inline]
    pub fn record(&mut self, kind: KernelKind, nanos: u64) {
        self.stats.record(kind, nanos);
        self.histograms[kind.index()].record(nanos);
    }

    #[inline(always)]
    pub fn stats(&self) -> &KernelStats {
        &self.stats
    }

    #[inline(always)]
    pub fn histogram(&self, kind: KernelKind) -> &LatencyHistogram {
        &self.histograms[kind.index()]
    }

    /// Log counters and every non-empty distribution.
    pub fn log_summary(&self) {
        self.stats.log_summary();
        for kind in KernelKind::ALL {
            let histogram = self.histogram(kind);
            if histogram.count() > 0 {
                histogram.log_summary(kind.name());
            }
        }
    }
}
