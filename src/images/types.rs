/// Cache entry, key and metrics types for the image resolver
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Probe state of a cache entry
///
/// `Loading` transitions exactly once to `Loaded` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Loading,
    Loaded,
    Error,
}

/// Composite key: (probe target, fallback label)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub target: String,
    pub label: String,
}

impl CacheKey {
    pub fn new(target: &str, label: &str) -> Self {
        Self {
            target: target.to_string(),
            label: label.to_string(),
        }
    }
}

/// Cache entry with TTL tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub resolved_url: String,
    pub status: EntryStatus,
    /// Creation or last transition instant
    pub timestamp: Instant,
}

impl CacheEntry {
    pub fn loading(target: &str) -> Self {
        Self {
            resolved_url: target.to_string(),
            status: EntryStatus::Loading,
            timestamp: Instant::now(),
        }
    }

    pub fn loaded(target: &str) -> Self {
        Self {
            resolved_url: target.to_string(),
            status: EntryStatus::Loaded,
            timestamp: Instant::now(),
        }
    }

    pub fn failed(fallback: &str) -> Self {
        Self {
            resolved_url: fallback.to_string(),
            status: EntryStatus::Error,
            timestamp: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    pub fn is_expired(&self, retention: Duration) -> bool {
        self.age() > retention
    }
}

/// Live counters, updated without taking the cache lock
#[derive(Debug, Default)]
pub(crate) struct MetricCounters {
    pub hits: AtomicU64,
    pub error_hits: AtomicU64,
    pub shared_waits: AtomicU64,
    pub probes: AtomicU64,
    pub probe_failures: AtomicU64,
    pub probe_timeouts: AtomicU64,
    pub untrusted: AtomicU64,
    pub swept: AtomicU64,
}

impl MetricCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResolverMetrics {
        ResolverMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            error_hits: self.error_hits.load(Ordering::Relaxed),
            shared_waits: self.shared_waits.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            probe_timeouts: self.probe_timeouts.load(Ordering::Relaxed),
            untrusted: self.untrusted.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
        }
    }
}

/// Resolver metrics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolverMetrics {
    /// Fresh `loaded` entries served
    pub hits: u64,
    /// Fresh `error` entries short-circuited to the fallback
    pub error_hits: u64,
    /// Requests that joined an in-flight probe
    pub shared_waits: u64,
    pub probes: u64,
    /// Failed probes, timeouts included
    pub probe_failures: u64,
    pub probe_timeouts: u64,
    /// Candidates rejected by the trust check
    pub untrusted: u64,
    pub swept: u64,
}

impl ResolverMetrics {
    /// Share of requests answered without starting a probe
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.error_hits + self.shared_waits;
        let total = served + self.probes;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}
