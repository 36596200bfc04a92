//! candela-binance
//!
//! Thin shim over the public Binance spot `/api/v3/klines` endpoint.
#![warn(missing_docs)]

/// Builder for [`BinanceConnector`].
pub mod builder;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;

use candela_core::probe::{self, probe_request};
use candela_core::{
    AdapterCache, BINANCE_TIMEFRAMES, CandelaError, Candle, CandleConnector, FetchRequest,
    StatsCollector, normalize_series,
};

pub use builder::BinanceConnectorBuilder;

/// Public REST root.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// Most klines Binance returns per call.
pub const MAX_KLINES: usize = 1000;

/// Binance spot klines connector.
pub struct BinanceConnector {
    http: reqwest::Client,
    base_url: String,
    cache: AdapterCache,
    stats: Arc<StatsCollector>,
}

impl std::fmt::Debug for BinanceConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceConnector")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl BinanceConnector {
    /// Provider name reported in logs, statistics and errors.
    pub const NAME: &'static str = "Binance";

    async fn fetch_klines(
        &self,
        req: &FetchRequest,
        interval: &str,
    ) -> Result<Vec<Candle>, CandelaError> {
        let url = format!("{}/api/v3/klines", self.base_url.trim_end_matches('/'));
        let mut query: Vec<(&str, String)> = vec![
            ("symbol", req.symbol.clone()),
            ("interval", interval.to_string()),
            ("limit", req.limit.min(MAX_KLINES).to_string()),
        ];
        if let Some(start) = req.start {
            query.push(("startTime", start.to_string()));
        }
        if let Some(end) = req.end {
            query.push(("endTime", end.to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, ?query, "requesting Binance klines");

        self.stats.record_request(Self::NAME, req.timeframe.minutes());
        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| CandelaError::connector(Self::NAME, e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| CandelaError::connector(Self::NAME, e.to_string()))?;

        if status == reqwest::StatusCode::BAD_REQUEST {
            if let Ok(api) = serde_json::from_slice::<wire::ApiError>(&body) {
                if api.code == wire::INVALID_SYMBOL {
                    return Ok(Vec::new());
                }
                return Err(CandelaError::connector(
                    Self::NAME,
                    format!("API error {}: {}", api.code, api.msg),
                ));
            }
        }
        if !status.is_success() {
            return Err(CandelaError::connector(Self::NAME, format!("HTTP {status}")));
        }

        let candles = serde_json::from_slice::<Vec<wire::Kline>>(&body)?
            .into_iter()
            .map(Candle::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(normalize_series(candles, req.limit))
    }

    async fn probe(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let probe = self.fetch_klines(&probe_request(req), "1d").await;
        probe::resolve_probe(&BINANCE_TIMEFRAMES, req, probe)
    }

    async fn fetch_uncached(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let Some(interval) = BINANCE_TIMEFRAMES.token(req.timeframe.minutes()) else {
            return self.probe(req).await;
        };
        let candles = self.fetch_klines(req, interval).await?;
        if probe::needs_probe(req, candles.len()) {
            return self.probe(req).await;
        }
        Ok(candles)
    }

    /// Drop every cached series.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl CandleConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela_binance::fetch",
            skip(self, req),
            fields(symbol = %req.symbol, timeframe = %req.timeframe, limit = req.limit),
        )
    )]
    async fn fetch(&self, req: &FetchRequest) -> Result<Arc<[Candle]>, CandelaError> {
        self.cache
            .get_or_fetch(Self::NAME, req, &self.stats, || self.fetch_uncached(req))
            .await
    }
}
