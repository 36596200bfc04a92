//! candela-moex
//!
//! Connector for the Moscow Exchange ISS candle endpoint.
//!
//! ISS answers at most 500 records per call and selects records by calendar
//! date, not by count. The connector therefore sizes a date window from the
//! requested bar count, asks for the window newest-first, and walks it with
//! `start` offsets until enough distinct candles have been collected.
#![warn(missing_docs)]

/// Builder for [`MoexConnector`].
pub mod builder;
mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Moscow;

use candela_core::probe::{self, probe_request};
use candela_core::{
    AdapterCache, CandelaError, Candle, CandleConnector, DateWindow, DedupKey, FetchRequest,
    MOEX_TIMEFRAMES, StatsCollector, fetch_paginated,
};

pub use builder::MoexConnectorBuilder;

/// Smallest number of bars a computed date window is sized for.
pub const MIN_WINDOW_BARS: usize = 10;

/// Public ISS endpoint.
pub const DEFAULT_BASE_URL: &str = "https://iss.moex.com/iss";

const DAILY_TOKEN: &str = "24";

/// MOEX ISS candle connector.
pub struct MoexConnector {
    http: reqwest::Client,
    base_url: String,
    engine: String,
    market: String,
    board: String,
    page_size: usize,
    cache: AdapterCache,
    stats: Arc<StatsCollector>,
    clock: fn() -> DateTime<Utc>,
}

impl std::fmt::Debug for MoexConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoexConnector")
            .field("base_url", &self.base_url)
            .field("board", &self.board)
            .field("page_size", &self.page_size)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl MoexConnector {
    /// Provider name reported in logs, statistics and errors.
    pub const NAME: &'static str = "MOEX";

    fn candles_url(&self, symbol: &str) -> String {
        format!(
            "{}/engines/{}/markets/{}/boards/{}/securities/{}/candles.json",
            self.base_url.trim_end_matches('/'),
            self.engine,
            self.market,
            self.board,
            symbol
        )
    }

    fn window(&self, req: &FetchRequest) -> DateWindow {
        if req.has_range() {
            DateWindow::explicit(req.start, req.end)
        } else {
            DateWindow::for_bars(
                req.limit.max(MIN_WINDOW_BARS),
                req.timeframe.minutes(),
                (self.clock)(),
            )
        }
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        interval: &str,
        minutes: u32,
        window: &DateWindow,
        offset: usize,
    ) -> Result<Vec<Candle>, CandelaError> {
        let url = self.candles_url(symbol);
        let mut query: Vec<(&str, String)> = vec![("interval", interval.to_string())];
        if let Some(from) = window.from_param() {
            query.push(("from", from));
        }
        if let Some(till) = window.till_param() {
            query.push(("till", till));
        }
        query.extend([
            ("start", offset.to_string()),
            ("iss.reverse", "true".to_string()),
            ("iss.meta", "off".to_string()),
        ]);

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, ?query, "requesting ISS candles page");

        self.stats.record_request(Self::NAME, minutes);
        let resp = self
            .http
            .get(&url)
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
        serde_json::from_slice::<wire::IssResponse>(&body)?.into_candles()
    }

    async fn fetch_series(
        &self,
        req: &FetchRequest,
        interval: &'static str,
    ) -> Result<Vec<Candle>, CandelaError> {
        let window = self.window(req);
        let minutes = req.timeframe.minutes();
        let key = DedupKey::for_minutes(minutes, Moscow);
        let this = self;
        let symbol = req.symbol.as_str();
        let window = &window;
        fetch_paginated(req.limit, self.page_size, key, move |offset| {
            this.fetch_page(symbol, interval, minutes, window, offset)
        })
        .await
    }

    async fn probe(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let probe = self.fetch_series(&probe_request(req), DAILY_TOKEN).await;
        probe::resolve_probe(&MOEX_TIMEFRAMES, req, probe)
    }

    async fn fetch_uncached(&self, req: &FetchRequest) -> Result<Vec<Candle>, CandelaError> {
        let Some(interval) = MOEX_TIMEFRAMES.token(req.timeframe.minutes()) else {
            return self.probe(req).await;
        };
        let candles = self.fetch_series(req, interval).await?;
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
impl CandleConnector for MoexConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candela_moex::fetch",
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
