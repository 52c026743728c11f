use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::Upstream;

#[derive(Default)]
pub struct AtomicMetrics {
    accepted: AtomicU64,
    processed_default: AtomicU64,
    processed_fallback: AtomicU64,
    dropped: AtomicU64,
    sink_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub accepted: u64,
    pub processed_default: u64,
    pub processed_fallback: u64,
    pub dropped: u64,
    pub sink_failures: u64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_processed(&self, upstream: Upstream) {
        let counter = match upstream {
            Upstream::Primary => &self.processed_default,
            Upstream::Fallback => &self.processed_fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sink_failures(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            processed_default: self.processed_default.load(Ordering::Relaxed),
            processed_fallback: self.processed_fallback.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}
