//! Process-wide request accounting.
//!
//! A single [`StatsCollector`] is created by the caller and shared (as an
//! `Arc`) between the manager and every adapter.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::timeframe::canonical_label;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Per-provider counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCounters {
    /// Upstream requests issued.
    pub requests: u64,
    /// Requests answered from the adapter cache.
    pub cache_hits: u64,
    /// Requests that missed the adapter cache.
    pub cache_misses: u64,
}

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
    coalesced: u64,
    by_provider: BTreeMap<String, ProviderCounters>,
    by_timeframe: BTreeMap<String, u64>,
}

/// Point-in-time snapshot of the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Upstream requests across all providers.
    pub total_requests: u64,
    /// Cache hits across all providers.
    pub cache_hits: u64,
    /// Cache misses across all providers.
    pub cache_misses: u64,
    /// Hit rate in percent, rounded to one decimal. Zero when nothing was looked up.
    pub cache_hit_rate: f64,
    /// Callers that attached to an already running fetch.
    pub coalesced: u64,
    /// Counters keyed by provider name.
    pub by_provider: BTreeMap<String, ProviderCounters>,
    /// Upstream requests keyed by the provider-native timeframe token.
    pub by_timeframe: BTreeMap<String, u64>,
}

/// Thread-safe counters of upstream requests, cache hits and coalesced waits.
#[derive(Debug, Default)]
pub struct StatsCollector {
    inner: Mutex<Counters>,
}

impl StatsCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count one upstream request for a bar length of `minutes`.
    ///
    /// Timeframes are tallied under their canonical label, so `"60"` on one
    /// provider and `"1h"` on another land in the same bucket.
    pub fn record_request(&self, provider: &str, minutes: u32) {
        let mut c = self.lock();
        c.total_requests += 1;
        c.by_provider
            .entry(provider.to_string())
            .or_default()
            .requests += 1;
        *c.by_timeframe.entry(canonical_label(minutes)).or_default() += 1;
    }

    /// Count a cache hit for `provider`.
    pub fn record_cache_hit(&self, provider: &str) {
        let mut c = self.lock();
        c.cache_hits += 1;
        c.by_provider
            .entry(provider.to_string())
            .or_default()
            .cache_hits += 1;
    }

    /// Count a cache miss for `provider`.
    pub fn record_cache_miss(&self, provider: &str) {
        let mut c = self.lock();
        c.cache_misses += 1;
        c.by_provider
            .entry(provider.to_string())
            .or_default()
            .cache_misses += 1;
    }

    /// Count a caller that joined an in-flight fetch instead of starting one.
    pub fn record_coalesced(&self) {
        self.lock().coalesced += 1;
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        let c = self.lock();
        let lookups = c.cache_hits + c.cache_misses;
        #[allow(clippy::cast_precision_loss)]
        let cache_hit_rate = if lookups == 0 {
            0.0
        } else {
            (c.cache_hits as f64 / lookups as f64 * 1000.0).round() / 10.0
        };
        StatsSummary {
            total_requests: c.total_requests,
            cache_hits: c.cache_hits,
            cache_misses: c.cache_misses,
            cache_hit_rate,
            coalesced: c.coalesced,
            by_provider: c.by_provider.clone(),
            by_timeframe: c.by_timeframe.clone(),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        *self.lock() = Counters::default();
    }

    /// Emit the current summary as a structured `debug` event.
    pub fn log_summary(&self) {
        let s = self.summary();
        #[cfg(feature = "tracing")]
        debug!(
            total_requests = s.total_requests,
            cache_hits = s.cache_hits,
            cache_misses = s.cache_misses,
            cache_hit_rate = s.cache_hit_rate,
            coalesced = s.coalesced,
            providers = ?s.by_provider,
            timeframes = ?s.by_timeframe,
            "candela request statistics"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = s;
    }
}
