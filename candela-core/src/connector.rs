use std::sync::Arc;

use async_trait::async_trait;

use crate::timeframe::Timeframe;
use crate::{Candle, CandelaError};

/// Parameters of one candle fetch.
///
/// `start` and `end` are optional epoch-millisecond bounds. When either is set
/// the adapter fetches that explicit range instead of sizing its own window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    /// Ticker in the provider's own symbology.
    pub symbol: String,
    /// Requested timeframe.
    pub timeframe: Timeframe,
    /// Maximum number of candles wanted, most recent first.
    pub limit: usize,
    /// Optional range start, epoch milliseconds.
    pub start: Option<i64>,
    /// Optional range end, epoch milliseconds.
    pub end: Option<i64>,
}

impl FetchRequest {
    /// Request the most recent `limit` candles of `symbol` at `timeframe`.
    pub fn new(symbol: impl Into<String>, timeframe: impl Into<Timeframe>, limit: usize) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            limit,
            start: None,
            end: None,
        }
    }

    /// Restrict the request to an explicit range.
    #[must_use]
    pub const fn with_range(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// True if the caller pinned an explicit start or end.
    #[must_use]
    pub const fn has_range(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Same symbol and range, re-targeted at another timeframe and limit.
    #[must_use]
    pub fn retarget(&self, timeframe: Timeframe, limit: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            timeframe,
            limit,
            start: self.start,
            end: self.end,
        }
    }
}

/// A market-data source able to return canonical candles.
///
/// Implementations translate the request into their upstream protocol,
/// normalize the answer into [`Candle`]s sorted ascending by `open_time`, and
/// classify failures through [`CandelaError`]. An empty series is a valid
/// outcome meaning "nothing here", distinct from an error.
#[async_trait]
pub trait CandleConnector: Send + Sync {
    /// Stable provider name used in logs, statistics and error payloads.
    fn name(&self) -> &'static str;

    /// Fetch at most `req.limit` candles.
    ///
    /// # Errors
    /// - `TimeframeUnsupported` when the provider has the symbol but not the
    ///   timeframe.
    /// - `Connector`/`Data`/`Other` for transport and decoding failures.
    async fn fetch(&self, req: &FetchRequest) -> Result<Arc<[Candle]>, CandelaError>;
}
