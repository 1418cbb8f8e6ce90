/// Image resolution cache
///
/// Resolves a candidate image URL plus a fallback label to a URL known to
/// load, memoizing each probe outcome for the retention window.
///
/// Concurrent requests for a key whose probe is still running wait for that
/// probe and share its result. Probes run on their own task, so a caller that
/// gives up never cancels a probe and its outcome is still recorded.
use super::fallback::FallbackTemplate;
use super::loader::{HttpImageLoader, ImageLoader};
use super::sweeper::SweepTask;
use super::trust::TrustPolicy;
use super::types::{CacheEntry, CacheKey, EntryStatus, MetricCounters, ResolverMetrics};
use crate::config::{Config, ImagesConfig};
use crate::errors::ProbeError;
use crate::logger::{self, LogTag};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Handle to the resolver; clones share one cache
#[derive(Clone)]
pub struct ImageResolver {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<State>,
    loader: Arc<dyn ImageLoader>,
    trust: TrustPolicy,
    fallback: FallbackTemplate,
    retention: Duration,
    probe_timeout: Duration,
    sweep_interval: Duration,
    metrics: MetricCounters,
}

#[derive(Default)]
struct State {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Result channels of running probes; a key is here iff its probe task is live
    in_flight: HashMap<CacheKey, watch::Receiver<Option<String>>>,
}

enum Lookup {
    Ready(String),
    Wait(watch::Receiver<Option<String>>),
}

impl ImageResolver {
    pub fn new(config: &ImagesConfig, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                loader,
                trust: TrustPolicy::new(&config.trusted_hosts),
                fallback: FallbackTemplate::from_config(config),
                retention: config.retention_window(),
                probe_timeout: config.probe_timeout(),
                sweep_interval: config.sweep_interval(),
                metrics: MetricCounters::default(),
            }),
        }
    }

    /// Resolver probing over HTTP
    pub fn from_config(config: &Config) -> Result<Self, ProbeError> {
        let loader = HttpImageLoader::new(&config.probe)?;
        Ok(Self::new(&config.images, Arc::new(loader)))
    }

    /// Resolve `candidate_url` to a URL that loads, or to the placeholder for
    /// `fallback_label`. Never fails and never returns an empty string.
    ///
    /// Must be called from within a Tokio runtime: probes run on spawned tasks.
    pub async fn resolve(&self, candidate_url: &str, fallback_label: &str) -> String {
        let fallback = self.inner.fallback.url_for(fallback_label);
        let target = self.probe_target(candidate_url, &fallback);
        let key = CacheKey::new(&target, fallback_label);

        let mut rx = match self.begin(key, &target, &fallback) {
            Lookup::Ready(url) => return url,
            Lookup::Wait(rx) => rx,
        };

        // Err means the probe task died without reporting
        let resolved = match rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };
        resolved.unwrap_or(fallback)
    }

    /// Remove every entry older than the retention window
    ///
    /// Returns the number of entries removed. Running probes are untouched.
    pub fn sweep(&self) -> usize {
        let retention = self.inner.retention;
        let removed = {
            let mut state = self.inner.state.lock();
            let before = state.entries.len();
            state.entries.retain(|_, entry| !entry.is_expired(retention));
            state.in_flight.retain(|_, rx| rx.has_changed().is_ok());
            before - state.entries.len()
        };

        if removed > 0 {
            self.inner
                .metrics
                .swept
                .fetch_add(removed as u64, std::sync::atomic::Ordering::Relaxed);
            logger::debug(
                LogTag::Sweep,
                &format!("Removed {} stale image entries", removed),
            );
        }
        removed
    }

    /// Start the periodic sweep on its own task
    pub fn start_sweeper(&self) -> SweepTask {
        SweepTask::start(self.clone(), self.inner.sweep_interval)
    }

    /// Entry currently cached for these inputs, stale or not
    pub fn cached_entry(&self, candidate_url: &str, fallback_label: &str) -> Option<CacheEntry> {
        let fallback = self.inner.fallback.url_for(fallback_label);
        let target = if self.inner.trust.is_trusted(candidate_url) {
            candidate_url.to_string()
        } else {
            fallback
        };
        self.inner
            .state
            .lock()
            .entries
            .get(&CacheKey::new(&target, fallback_label))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries
    ///
    /// Probes already running keep their in-flight record, so a request
    /// arriving after `clear()` joins them instead of probing again, and they
    /// still record their outcome.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.entries.clear();
        state.in_flight.retain(|_, rx| rx.has_changed().is_ok());
    }

    pub fn metrics(&self) -> ResolverMetrics {
        self.inner.metrics.snapshot()
    }

    pub fn fallback_url(&self, fallback_label: &str) -> String {
        self.inner.fallback.url_for(fallback_label)
    }

    /// Whether `url` is a placeholder rather than a real image
    pub fn is_fallback_url(&self, url: &str) -> bool {
        self.inner.fallback.matches(url)
    }

    pub fn is_trusted(&self, candidate_url: &str) -> bool {
        self.inner.trust.is_trusted(candidate_url)
    }

    fn probe_target(&self, candidate_url: &str, fallback: &str) -> String {
        if self.inner.trust.is_trusted(candidate_url) {
            return candidate_url.to_string();
        }

        MetricCounters::bump(&self.inner.metrics.untrusted);
        logger::debug(
            LogTag::Images,
            &format!("Untrusted image source '{}', using {}", candidate_url, fallback),
        );
        fallback.to_string()
    }

    /// Answer from the cache, join a running probe, or start one
    ///
    /// Runs entirely under the state lock so two callers can never both
    /// start a probe for the same key.
    fn begin(&self, key: CacheKey, target: &str, fallback: &str) -> Lookup {
        let metrics = &self.inner.metrics;
        let mut state = self.inner.state.lock();

        if let Some(rx) = state.in_flight.get(&key) {
            if rx.has_changed().is_ok() {
                MetricCounters::bump(&metrics.shared_waits);
                logger::verbose(
                    LogTag::Probe,
                    &format!("Joining in-flight probe for {}", target),
                );
                return Lookup::Wait(rx.clone());
            }
            state.in_flight.remove(&key);
        }

        if let Some(entry) = state.entries.get(&key) {
            if !entry.is_expired(self.inner.retention) {
                match entry.status {
                    EntryStatus::Loaded => {
                        MetricCounters::bump(&metrics.hits);
                        return Lookup::Ready(entry.resolved_url.clone());
                    }
                    EntryStatus::Error => {
                        MetricCounters::bump(&metrics.error_hits);
                        return Lookup::Ready(fallback.to_string());
                    }
                    // Loading without a live probe: start over
                    EntryStatus::Loading => {}
                }
            }
        }

        let (tx, rx) = watch::channel(None);
        state.entries.insert(key.clone(), CacheEntry::loading(target));
        state.in_flight.insert(key.clone(), rx.clone());
        drop(state);

        MetricCounters::bump(&metrics.probes);
        tokio::spawn(run_probe(
            Arc::clone(&self.inner),
            key,
            target.to_string(),
            fallback.to_string(),
            tx,
        ));
        Lookup::Wait(rx)
    }
}

async fn run_probe(
    inner: Arc<Inner>,
    key: CacheKey,
    target: String,
    fallback: String,
    tx: watch::Sender<Option<String>>,
) {
    logger::debug(LogTag::Probe, &format!("Probing {}", target));

    let outcome = match tokio::time::timeout(inner.probe_timeout, inner.loader.load(&target)).await
    {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout {
            timeout_ms: inner.probe_timeout.as_millis() as u64,
        }),
    };

    let entry = match outcome {
        Ok(()) => {
            logger::debug(LogTag::Probe, &format!("Loaded {}", target));
            CacheEntry::loaded(&target)
        }
        Err(e) => {
            MetricCounters::bump(&inner.metrics.probe_failures);
            if e.is_timeout() {
                MetricCounters::bump(&inner.metrics.probe_timeouts);
            }
            logger::warning(
                LogTag::Probe,
                &format!("Image probe failed for {}: {}; using {}", target, e, fallback),
            );
            CacheEntry::failed(&fallback)
        }
    };

    let resolved = entry.resolved_url.clone();
    {
        let mut state = inner.state.lock();
        let own = tx.subscribe();
        let owns_key = state
            .in_flight
            .get(&key)
            .map(|rx| rx.same_channel(&own))
            .unwrap_or(false);
        // A newer probe may own the key; only the owner writes the entry
        if owns_key {
            state.entries.insert(key.clone(), entry);
            state.in_flight.remove(&key);
        }
    }

    // No receivers left is fine: the outcome is already cached
    let _ = tx.send(Some(resolved));
}
