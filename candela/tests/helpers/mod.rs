#![allow(dead_code)]

use std::sync::Arc;

use candela::{Candle, CandleConnector, ProviderManager, StatsCollector};
use candela_mock::fixtures;
use chrono::{DateTime, TimeZone, Utc};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

pub fn now_ms() -> i64 {
    fixed_now().timestamp_millis()
}

/// Fresh series of `n` bars at `minutes` ending at the fixed clock.
pub fn fresh(n: usize, minutes: u32) -> Vec<Candle> {
    fixtures::fresh_series(n, minutes, now_ms())
}

pub fn manager(
    connectors: &[Arc<dyn CandleConnector>],
    stats: Arc<StatsCollector>,
) -> ProviderManager {
    connectors
        .iter()
        .fold(ProviderManager::builder(), |b, c| b.with_connector(Arc::clone(c)))
        .stats(stats)
        .clock(fixed_now)
        .build()
        .unwrap()
}
