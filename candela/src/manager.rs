use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use candela_core::{
    CandelaError, Candle, CandleConnector, FailureClass, FetchRequest, FreshnessPolicy,
    StatsCollector, Timeframe, check_freshness,
};

/// The winning answer of one fetch: which provider served it and the series.
pub struct ProviderResult {
    /// Name of the connector that answered.
    pub provider: &'static str,
    /// Candles ascending by `open_time`, at most `limit` long.
    pub data: Arc<[Candle]>,
    /// The connector itself, for follow-up calls against the same source.
    pub connector: Arc<dyn CandleConnector>,
}

impl std::fmt::Debug for ProviderResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderResult")
            .field("provider", &self.provider)
            .field("candles", &self.data.len())
            .finish_non_exhaustive()
    }
}

type Settled = Result<Arc<ProviderResult>, CandelaError>;
type PendingFetch = Shared<BoxFuture<'static, Settled>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PendingKey {
    symbol: String,
    minutes: u32,
    limit: usize,
}

impl From<&FetchRequest> for PendingKey {
    fn from(req: &FetchRequest) -> Self {
        Self {
            symbol: req.symbol.clone(),
            minutes: req.timeframe.minutes(),
            limit: req.limit,
        }
    }
}

struct Chain {
    connectors: Vec<Arc<dyn CandleConnector>>,
    stats: Arc<StatsCollector>,
    freshness: FreshnessPolicy,
    clock: fn() -> DateTime<Utc>,
    pending: Mutex<HashMap<PendingKey, (u64, PendingFetch)>>,
    next_id: AtomicU64,
}

/// Removes a pending entry once its fetch settles, however it settles.
struct PendingGuard {
    chain: Arc<Chain>,
    key: PendingKey,
    id: u64,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut pending = self
            .chain
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if pending.get(&self.key).is_some_and(|(id, _)| *id == self.id) {
            pending.remove(&self.key);
        }
    }
}

/// Ordered fallback chain over candle connectors.
///
/// Connectors are tried in registration order; the first fresh, non-empty
/// series wins. `TimeframeUnsupported` and `StaleData` end the chain at once,
/// every other failure moves on to the next connector. Concurrent fetches for
/// the same symbol, timeframe and limit share one underlying run.
#[derive(Clone)]
pub struct ProviderManager {
    chain: Arc<Chain>,
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderManager")
            .field("providers", &self.providers())
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProviderManager`].
pub struct ProviderManagerBuilder {
    connectors: Vec<Arc<dyn CandleConnector>>,
    stats: Option<Arc<StatsCollector>>,
    freshness: FreshnessPolicy,
    clock: fn() -> DateTime<Utc>,
}

impl Default for ProviderManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderManagerBuilder {
    /// Empty chain with the default freshness policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            stats: None,
            freshness: FreshnessPolicy::default(),
            clock: Utc::now,
        }
    }

    /// Append a connector to the end of the chain.
    ///
    /// Registration order is priority order. Duplicates are not removed.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn CandleConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Share a statistics collector, usually the one the connectors record into.
    #[must_use]
    pub fn stats(mut self, stats: Arc<StatsCollector>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Maximum tolerated candle age per granularity.
    #[must_use]
    pub const fn freshness(mut self, policy: FreshnessPolicy) -> Self {
        self.freshness = policy;
        self
    }

    /// Wall clock used for freshness checks.
    #[must_use]
    pub const fn clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the manager.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered via [`with_connector`](Self::with_connector).
    pub fn build(self) -> Result<ProviderManager, CandelaError> {
        if self.connectors.is_empty() {
            return Err(CandelaError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        Ok(ProviderManager {
            chain: Arc::new(Chain {
                connectors: self.connectors,
                stats: self.stats.unwrap_or_default(),
                freshness: self.freshness,
                clock: self.clock,
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        })
    }
}

impl ProviderManager {
    /// Start building a manager.
    #[must_use]
    pub fn builder() -> ProviderManagerBuilder {
        ProviderManagerBuilder::new()
    }

    /// Provider names in chain order.
    #[must_use]
    pub fn providers(&self) -> Vec<&'static str> {
        self.chain.connectors.iter().map(|c| c.name()).collect()
    }

    /// Number of distinct fetches currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.chain
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The statistics collector this manager records into.
    #[must_use]
    pub fn stats(&self) -> &Arc<StatsCollector> {
        &self.chain.stats
    }

    /// Fetch the most recent `limit` candles of `symbol` at `timeframe`.
    ///
    /// A caller that joins a fetch already in flight for the same key gets
    /// the same settled outcome, success or error, and triggers no upstream
    /// calls of its own. Dropping the returned future does not cancel the
    /// underlying run.
    ///
    /// # Panics
    /// When polled outside a Tokio runtime, since the run is spawned onto
    /// the current runtime. No pending entry is left behind in that case.
    ///
    /// # Errors
    /// - `InvalidArg` when `limit` is zero.
    /// - `TimeframeUnsupported` or `StaleData` straight from the connector
    ///   that raised it.
    /// - `AllProvidersFailed` when no connector produced a usable series.
    pub async fn fetch(
        &self,
        symbol: &str,
        timeframe: impl Into<Timeframe> + Send,
        limit: usize,
    ) -> Result<Arc<ProviderResult>, CandelaError> {
        if limit == 0 {
            return Err(CandelaError::InvalidArg("limit must be positive".to_string()));
        }
        self.fetch_coalesced(FetchRequest::new(symbol, timeframe, limit))
            .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela::manager::fetch",
            skip(self, req),
            fields(symbol = %req.symbol, timeframe = %req.timeframe, limit = req.limit),
        )
    )]
    async fn fetch_coalesced(&self, req: FetchRequest) -> Settled {
        self.join_or_start(req).await
    }

    fn join_or_start(&self, req: FetchRequest) -> PendingFetch {
        // before locking: a missing runtime must not panic with `pending` held
        let runtime = tokio::runtime::Handle::current();
        let key = PendingKey::from(&req);
        let mut pending = self
            .chain
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some((_, fut)) = pending.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                symbol = %key.symbol,
                minutes = key.minutes,
                limit = key.limit,
                "joining in-flight fetch"
            );
            self.chain.stats.record_coalesced();
            return fut.clone();
        }

        let id = self.chain.next_id.fetch_add(1, Ordering::Relaxed);
        let guard = PendingGuard {
            chain: Arc::clone(&self.chain),
            key: key.clone(),
            id,
        };
        let chain = Arc::clone(&self.chain);
        let run = async move {
            let _guard = guard;
            chain.run(req).await
        };
        #[cfg(feature = "tracing")]
        let run = tracing::Instrument::in_current_span(run);
        let task = runtime.spawn(run);
        let fut = async move {
            task.await
                .unwrap_or_else(|e| Err(CandelaError::Other(format!("fetch task failed: {e}"))))
        }
        .boxed()
        .shared();
        pending.insert(key, (id, fut.clone()));
        fut
    }
}

impl Chain {
    async fn run(&self, req: FetchRequest) -> Settled {
        for connector in &self.connectors {
            let name = connector.name();
            #[cfg(feature = "tracing")]
            tracing::info!(provider = name, symbol = %req.symbol, timeframe = %req.timeframe, "attempting provider");
            #[cfg(feature = "tracing")]
            let started = std::time::Instant::now();

            match connector.fetch(&req).await {
                Ok(data) if data.is_empty() => {
                    #[cfg(feature = "tracing")]
                    tracing::info!(provider = name, symbol = %req.symbol, "no data");
                }
                Ok(data) => {
                    let now_ms = (self.clock)().timestamp_millis();
                    check_freshness(
                        name,
                        &req.symbol,
                        &req.timeframe,
                        &data,
                        &self.freshness,
                        now_ms,
                    )?;
                    #[cfg(feature = "tracing")]
                    tracing::info!(
                        provider = name,
                        symbol = %req.symbol,
                        candles = data.len(),
                        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "found data"
                    );
                    return Ok(Arc::new(ProviderResult {
                        provider: name,
                        data,
                        connector: Arc::clone(connector),
                    }));
                }
                Err(err) => match err.class() {
                    FailureClass::Unsupported | FailureClass::Stale => return Err(err),
                    FailureClass::Transient => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(provider = name, symbol = %req.symbol, error = %err, "provider failed, trying next");
                        #[cfg(not(feature = "tracing"))]
                        let _ = err;
                    }
                },
            }
        }
        Err(CandelaError::all_providers_failed(req.symbol))
    }
}
