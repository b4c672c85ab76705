use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared success/failure counters for one supervisor invocation
///
/// The store is a cheap `Clone` handle around a pair of atomic counters.
/// The supervision loop is the sole writer; the metrics server reads a
/// snapshot on every scrape. Counters are monotonic and never reset for
/// the lifetime of the process.
///
/// Per-field atomicity is the only consistency guarantee: a snapshot may
/// race with an in-flight increment and read stale-by-one values, but it
/// can never observe a partially-updated counter.
#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    success_total: AtomicU64,
    failure_total: AtomicU64,
}

impl MetricsStore {
    /// Create a new store with both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one child run that exited with code 0
    pub fn record_success(&self) {
        self.inner.success_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one child run that exited non-zero or terminated abnormally
    pub fn record_failure(&self) {
        self.inner.failure_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Read both counters
    ///
    /// The two loads are independent; the pair is not required to be
    /// mutually consistent, only each field on its own.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            success_total: self.inner.success_total.load(Ordering::Relaxed),
            failure_total: self.inner.failure_total.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub success_total: u64,
    pub failure_total: u64,
}
