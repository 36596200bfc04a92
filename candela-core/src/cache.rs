//! Per-adapter TTL cache of fetched series.

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;

use crate::connector::FetchRequest;
use crate::stats::StatsCollector;
use crate::{CacheConfig, Candle, CandelaError};

/// Identity of a cached series within one adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbol: String,
    minutes: u32,
    limit: usize,
    start: Option<i64>,
    end: Option<i64>,
}

impl From<&FetchRequest> for CacheKey {
    fn from(req: &FetchRequest) -> Self {
        Self {
            symbol: req.symbol.clone(),
            minutes: req.timeframe.minutes(),
            limit: req.limit,
            start: req.start,
            end: req.end,
        }
    }
}

/// Cache of non-empty series keyed by request identity.
///
/// Entries expire after the configured TTL. Errors and empty series are never
/// stored. A zero TTL turns the cache into a pass-through.
#[derive(Clone)]
pub struct AdapterCache {
    inner: Option<Cache<CacheKey, Arc<[Candle]>>>,
}

impl std::fmt::Debug for AdapterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterCache")
            .field("enabled", &self.inner.is_some())
            .finish()
    }
}

impl AdapterCache {
    /// Build a cache from configuration.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        let inner = cfg.is_enabled().then(|| {
            Cache::builder()
                .max_capacity(cfg.max_entries)
                .time_to_live(cfg.ttl)
                .build()
        });
        Self { inner }
    }

    /// A cache that never stores anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { inner: None }
    }

    /// True when entries can be stored.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Look up a live entry.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<[Candle]>> {
        match &self.inner {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// Store a series. Empty series are ignored.
    pub async fn insert(&self, key: CacheKey, series: Arc<[Candle]>) {
        if series.is_empty() {
            return;
        }
        if let Some(cache) = &self.inner {
            cache.insert(key, series).await;
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    /// Serve `req` from cache or run `fetch` and remember a non-empty result.
    ///
    /// Hits and misses are recorded against `provider`.
    ///
    /// # Errors
    /// Propagates whatever `fetch` returns; errors are not cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        provider: &str,
        req: &FetchRequest,
        stats: &StatsCollector,
        fetch: F,
    ) -> Result<Arc<[Candle]>, CandelaError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Candle>, CandelaError>>,
    {
        let key = CacheKey::from(req);
        if let Some(hit) = self.get(&key).await {
            stats.record_cache_hit(provider);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                provider,
                symbol = %req.symbol,
                timeframe = %req.timeframe,
                candles = hit.len(),
                "cache hit"
            );
            return Ok(hit);
        }
        stats.record_cache_miss(provider);

        let series: Arc<[Candle]> = fetch().await?.into();
        self.insert(key, Arc::clone(&series)).await;
        Ok(series)
    }
}
