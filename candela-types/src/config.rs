//! Configuration types shared across the manager and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-adapter response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a cached series stays valid. Zero disables caching.
    pub ttl: Duration,
    /// Maximum number of cached series per adapter.
    pub max_entries: u64,
}

impl CacheConfig {
    /// Default time-to-live for cached series (five minutes).
    pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

    /// Cache settings with caching turned off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            max_entries: 0,
        }
    }

    /// Replace the time-to-live.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// True when entries can actually be stored.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Self::DEFAULT_TTL,
            max_entries: 1024,
        }
    }
}

/// Settings for adapters whose upstream caps the number of records per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Maximum records returned by one upstream call.
    pub page_size: usize,
}

impl PaginationConfig {
    /// Upstream page size used by date-windowed exchange APIs.
    pub const DEFAULT_PAGE_SIZE: usize = 500;
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Maximum tolerated age of the newest candle, in days, per timeframe granularity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FreshnessPolicy {
    /// Sub-hour timeframes.
    pub minute_max_days: f64,
    /// Hourly timeframes below one day.
    pub hour_max_days: f64,
    /// Daily timeframe.
    pub daily_max_days: f64,
    /// Weekly, monthly and anything else.
    pub other_max_days: f64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            minute_max_days: 1.0,
            hour_max_days: 2.0,
            daily_max_days: 7.0,
            other_max_days: 30.0,
        }
    }
}

/// Bundle of every tunable used by a candela deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandelaConfig {
    /// Adapter cache settings.
    pub cache: CacheConfig,
    /// Page sizing for paginating adapters.
    pub pagination: PaginationConfig,
    /// Freshness thresholds applied by the manager.
    pub freshness: FreshnessPolicy,
}
