//! Candela fetches OHLCV candles through an ordered chain of market-data providers.
//!
//! Overview
//! - Connectors implement [`CandleConnector`]; the [`ProviderManager`] tries them
//!   in registration order and returns the first fresh, non-empty series.
//! - Timeframes are canonicalized to minutes; each connector maps them onto its
//!   own vocabulary and reports unsupported ones with the list it does accept.
//! - Concurrent identical requests are coalesced into one run of the chain.
//!
//! Failure policy
//! - `TimeframeUnsupported`: the symbol exists but the timeframe does not. Ends
//!   the chain, since asking the next provider cannot change the answer.
//! - `StaleData`: the newest candle is older than [`FreshnessPolicy`] allows.
//!   Ends the chain.
//! - Anything else (network, HTTP status, malformed payload, empty series) is
//!   logged and the next provider is tried. When none qualifies the caller sees
//!   `AllProvidersFailed`.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use candela::{ProviderManager, StatsCollector};
//! use candela_moex::MoexConnector;
//! use candela_yahoo::YahooConnector;
//!
//! let stats = Arc::new(StatsCollector::new());
//! let moex = MoexConnector::builder().stats(stats.clone()).build()?;
//! let yahoo = YahooConnector::builder().stats(stats.clone()).build()?;
//!
//! let manager = ProviderManager::builder()
//!     .with_connector(Arc::new(moex))
//!     .with_connector(Arc::new(yahoo))
//!     .stats(stats)
//!     .build()?;
//!
//! let result = manager.fetch("SBER", "1h", 200).await?;
//! println!("{} candles from {}", result.data.len(), result.provider);
//! ```
//!
//! See `candela/examples/` for a runnable demonstration.
#![warn(missing_docs)]

mod manager;

pub use manager::{ProviderManager, ProviderManagerBuilder, ProviderResult};

pub use candela_core::{
    AdapterCache, CacheConfig, CandelaConfig, CandelaError, Candle, CandleConnector,
    FailureClass, FetchRequest, FreshnessPolicy, Granularity, PaginationConfig, StatsCollector,
    StatsSummary, Timeframe, TimeframeTable,
};
