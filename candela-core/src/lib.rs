//! candela-core
//!
//! Building blocks shared by the candela connectors and the provider manager.
//!
//! - `timeframe`: canonical minute parsing and per-provider interval tables.
//! - `connector`: the `CandleConnector` trait and `FetchRequest`.
//! - `cache`: per-adapter TTL cache of fetched series.
//! - `timeseries`: date-window sizing, offset pagination and overlap-safe merge.
//! - `probe`: unknown-symbol vs unsupported-timeframe disambiguation.
//! - `freshness`: staleness check of a provider's answer.
//! - `stats`: request and cache accounting.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Connectors and the manager are written against Tokio 1.x. The cache and
//! pagination helpers are runtime-agnostic futures, but the manager spawns
//! its fetches on the ambient Tokio runtime.
#![warn(missing_docs)]

/// Per-adapter TTL cache.
pub mod cache;
/// The `CandleConnector` trait and request type.
pub mod connector;
pub mod freshness;
pub mod probe;
pub mod stats;
pub mod timeframe;
/// Window sizing, pagination and merge utilities.
pub mod timeseries;

pub use cache::{AdapterCache, CacheKey};
pub use candela_types::{
    CacheConfig, CandelaConfig, CandelaError, Candle, FailureClass, FreshnessPolicy,
    PaginationConfig,
};
pub use connector::{CandleConnector, FetchRequest};
pub use freshness::check_freshness;
pub use stats::{ProviderCounters, StatsCollector, StatsSummary};
pub use timeframe::{
    BINANCE_TIMEFRAMES, DAILY_MINUTES, Granularity, MOEX_TIMEFRAMES, Timeframe, TimeframeTable,
    YAHOO_TIMEFRAMES,
};
pub use timeseries::merge::{DedupKey, SeriesMerger, merge_pages, normalize_series};
pub use timeseries::paginate::fetch_paginated;
pub use timeseries::window::DateWindow;
