//! Nanosecond latency distributions backed by HdrHistogram.

use core::fmt;

use hdrhistogram::{CreationError, Histogram};
use thiserror::Error;
use tracing::info;

/// Longest latency tracked at full precision (60 s). Larger samples clamp.
pub const MAX_TRACKED_NANOS: u64 = 60_000_000_000;

/// Histogram construction errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid histogram configuration: {0:?}")]
    Histogram(CreationError),
}

/// Summary of one distribution, in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencyPercentiles {
    pub count: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
    pub max: u64,
    pub mean: f64,
}

impl fmt::Display for LatencyPercentiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} p50={} p90={} p99={} p99.9={} max={}",
            self.count,
            Nanos(self.p50),
            Nanos(self.p90),
            Nanos(self.p99),
            Nanos(self.p999),
            Nanos(self.max),
        )
    }
}

/// Nanosecond count rendered with the largest fitting unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nanos(pub u64);

impl fmt::Display for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0;
        match nanos {
            0..=999 => write!(f, "{nanos} ns"),
            1_000..=999_999 => write!(f, "{:.2} µs", nanos as f64 / 1e3),
            1_000_000..=999_999_999 => write!(f, "{:.2} ms", nanos as f64 / 1e6),
            _ => write!(f, "{:.2} s", nanos as f64 / 1e9),
        }
    }
}

/// Latency distribution for one kernel.
#[derive(Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Histogram with 3 significant digits up to [`MAX_TRACKED_NANOS`].
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_precision(3)
    }

    /// Histogram with `sigfig` significant digits (0-5).
    pub fn with_precision(sigfig: u8) -> Result<Self, MetricsError> {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKED_NANOS, sigfig)
            .map_err(MetricsError::Histogram)?;
        Ok(Self { histogram })
    }

    /// Record one sample. Samples beyond the tracked range clamp to it.
    #[inline(always)]
    pub fn record(&mut self, nanos: u64) {
        self.histogram.saturating_record(nanos);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    /// Percentile summary of everything recorded so far.
    pub fn percentiles(&self) -> LatencyPercentiles {
        let at = |quantile: f64| self.histogram.value_at_quantile(quantile);
        LatencyPercentiles {
            count: self.histogram.len(),
            p50: at(0.50),
            p90: at(0.90),
            p99: at(0.99),
            p999: at(0.999),
            max: self.histogram.max(),
            mean: self.histogram.mean(),
        }
    }

    pub fn reset(&mut self) {
        self.histogram.reset();
    }

    /// Emit the distribution as one `info` event.
    pub fn log_summary(&self, kernel: &str) {
        let summary = self.percentiles();
        info!(kernel, mean_ns = summary.mean, "latency {summary}");
    }
}

impl fmt::Debug for LatencyHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LatencyHistogram").field(&self.percentiles()).finish()
    }
}
