//! Kernel telemetry.
//!
//! Nanosecond latency histograms, per-kernel call counters, a TSC-backed
//! clock and `tracing` subscriber setup.
//!
//! The kernels stay free of timing code; callers wrap the calls they care
//! about in [`KernelMonitor::time`], as the `kestrel-core` book bench does.

pub mod histogram;
pub mod stats;
pub mod clock;
pub mod telemetry;
pub mod monitor;

pub use histogram::{LatencyHistogram, LatencyPercentiles, MetricsError, Nanos, MAX_TRACKED_NANOS};
pub use stats::{KernelKind, KernelStats, StatsSnapshot};
pub use clock::KernelClock;
pub use telemetry::init_tracing;
pub use monitor::KernelMonitor;
