//! Per-kernel call counters.
//!
//! Counters are relaxed atomics: recording never blocks and a summary is
//! a best-effort view while recording continues.

use core::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

/// Kernel families tracked by [`KernelStats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelKind {
    BookUpdate,
    SignalCalculation,
    RiskValidation,
}

impl KernelKind {
    pub const ALL: [KernelKind; 3] = [
        KernelKind::BookUpdate,
        KernelKind::SignalCalculation,
        KernelKind::RiskValidation,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            KernelKind::BookUpdate => "book_update",
            KernelKind::SignalCalculation => "signal_calculation",
            KernelKind::RiskValidation => "risk_validation",
        }
    }
}

/// Plain copy of the counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub order_book_updates: u64,
    pub signal_calculations: u64,
    pub risk_validations: u64,
    pub total_latency_ns: u64,
    pub update_count: u64,
}

impl StatsSnapshot {
    /// Mean latency over all recorded calls, 0 when nothing was recorded.
    pub fn average_latency_ns(&self) -> f64 {
        if self.update_count == 0 {
            0.0
        } else {
            self.total_latency_ns as f64 / self.update_count as f64
        }
    }
}

/// Shared call counters and accumulated latency.
#[derive(Debug, Default)]
pub struct KernelStats {
    order_book_updates: AtomicU64,
    signal_calculations: AtomicU64,
    risk_validations: AtomicU64,
    total_latency_ns: AtomicU64,
    update_count: AtomicU64,
}

impl KernelStats {
    pub const fn new() -> Self {
        Self {
            order_book_updates: AtomicU64::new(0),
            signal_calculations: AtomicU64::new(0),
            risk_validations: AtomicU64::new(0),
            total_latency_ns: AtomicU64::new(0),
            update_count: AtomicU64::new(0),
        }
    }

    /// Count one call of `kind` that took `nanos`.
    #[inline]
    pub fn record(&self, kind: KernelKind, nanos: u64) {
        let counter = match kind {
            KernelKind::BookUpdate => &self.order_book_updates,
            KernelKind::SignalCalculation => &self.signal_calculations,
            KernelKind::RiskValidation => &self.risk_validations,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
        self.update_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            order_book_updates: self.order_book_updates.load(Ordering::Relaxed),
            signal_calculations: self.signal_calculations.load(Ordering::Relaxed),
            risk_validations: self.risk_validations.load(Ordering::Relaxed),
            total_latency_ns: self.total_latency_ns.load(Ordering::Relaxed),
            update_count: self.update_count.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub fn average_latency_ns(&self) -> f64 {
        self.snapshot().average_latency_ns()
    }

    pub fn reset(&self) {
        for counter in [
            &self.order_book_updates,
            &self.signal_calculations,
            &self.risk_validations,
            &self.total_latency_ns,
            &self.update_count,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Emit the counters as one `info` event.
    pub fn log_summary(&self) {
        let stats = self.snapshot();
        info!(
            book_updates = stats.order_book_updates,
            signal_calculations = stats.signal_calculations,
            risk_validations = stats.risk_validations,
            calls = stats.update_count,
            avg_latency_ns = stats.average_latency_ns(),
            "kernel stats"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_and_average() {
        let stats = KernelStats::new();
        assert_eq!(stats.average_latency_ns(), 0.0);

        stats.record(KernelKind::BookUpdate, 100);
        stats.record(KernelKind::BookUpdate, 300);
        stats.record(KernelKind::RiskValidation, 200);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.order_book_updates, 2);
        assert_eq!(snapshot.signal_calculations, 0);
        assert_eq!(snapshot.risk_validations, 1);
        assert_eq!(snapshot.update_count, 3);
        assert_eq!(snapshot.total_latency_ns, 600);
        assert_eq!(stats.average_latency_ns(), 200.0);
        stats.log_summary();

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_concurrent_recording() {
        let stats = Arc::new(KernelStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        stats.record(KernelKind::SignalCalculation, 10);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.signal_calculations, 4_000);
        assert_eq!(snapshot.total_latency_ns, 40_000);
    }
}
