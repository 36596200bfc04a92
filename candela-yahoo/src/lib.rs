//! candela-yahoo
//!
//! Connector for the Yahoo Finance v8 chart endpoint. One request per fetch:
//! the bar count is translated into a `range` token, or an explicit range
//! into `period1`/`period2`.
#![warn(missing_docs)]

/// Builder for [`YahooConnector`].
pub mod builder;
mod range;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use candela_core::probe::{self, probe_request};
use candela_core::{
    AdapterCache, CandelaError, Candle, CandleConnector, FetchRequest, StatsCollector,
    YAHOO_TIMEFRAMES, normalize_series,
};

pub use builder::YahooConnectorBuilder;

/// Public chart endpoint.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// Browser-like agent; the chart API rejects empty agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Yahoo Finance chart connector.
pub struct YahooConnector {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    cache: AdapterCache,
    stats: Arc<StatsCollector>,
    clock: fn() -> DateTime<Utc>,
}

impl std::fmt::Debug for YahooConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooConnector")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl YahooConnector {
    /// Provider name reported in logs, statistics and errors.
    pub const NAME: &'static str = "YahooFinance";

    async fn fetch_chart(
        &self,
        req: &FetchRequest,
        interval: &str,
    ) -> Result<Vec<Candle>, CandelaError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), req.symbol);
        let mut query: Vec<(&str, String)> = vec![("interval", interval.to_string())];
        if req.has_range() {
            let period1 = req.start.map_or(0, |ms| ms / 1000);
            let period2 = req
                .end
                .map_or_else(|| (self.clock)().timestamp(), |ms| ms / 1000);
            query.push(("period1", period1.to_string()));
            query.push(("period2", period2.to_string()));
        } else {
            let range = range::range_for(req.limit, req.timeframe.minutes());
            query.push(("range", range.to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, ?query, "requesting Yahoo chart");

        self.stats.record_request(Self::NAME, req.timeframe.minutes());
        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&query)
            .send()
            .await
            .map_err(|e| CandelaError::connector(Self::NAME, e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(CandelaError::connector(Self::NAME, format!("HTTP {status}")));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| CandelaError::connector(Self::NAME, e.to_string()))?;
        let candles = serde_json::from_slice::<wire::ChartResponse>(&body)?
            .into_candles(req.timeframe.minutes())?;
        Ok(normalize_series(candles, req.limit))
    }

    async fn probe(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let probe_req = probe_request(req);
        let probe = self.fetch_chart(&probe_req, "1d").await;
        probe::resolve_probe(&YAHOO_TIMEFRAMES, req, probe)
    }

    async fn fetch_uncached(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let Some(interval) = YAHOO_TIMEFRAMES.token(req.timeframe.minutes()) else {
            return self.probe(req).await;
        };
        let candles = self.fetch_chart(req, interval).await?;
        if probe::needs_probe(req, candles.len()) {
            return self.probe(req).await;
        }
        Ok(candles)
    }

    /// The shared statistics collector this connector records into.
    #[must_use]
    pub fn stats(&self) -> &Arc<StatsCollector> {
        &self.stats
    }

    /// Drop every cached series.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl CandleConnector for YahooConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela_yahoo::fetch",
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
