use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::Candle;
use crate::timeframe::DAILY_MINUTES;

/// Identity used to detect the same bar arriving twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    /// Bars are identical when their `open_time` matches.
    OpenTime,
    /// Bars are identical when they open on the same trading day in the
    /// exchange's time zone. Daily and longer bars from date-windowed
    /// upstreams can carry different intraday stamps for the same session.
    TradingDay(Tz),
}

impl DedupKey {
    /// Pick the key for a timeframe: trading day for daily and longer bars,
    /// open time otherwise.
    #[must_use]
    pub const fn for_minutes(minutes: u32, exchange_tz: Tz) -> Self {
        if minutes >= DAILY_MINUTES {
            Self::TradingDay(exchange_tz)
        } else {
            Self::OpenTime
        }
    }

    /// Key value for one candle.
    #[must_use]
    pub fn key(&self, candle: &Candle) -> i64 {
        match self {
            Self::OpenTime => candle.open_time,
            Self::TradingDay(tz) => DateTime::<Utc>::from_timestamp_millis(candle.open_time)
                .map_or(candle.open_time, |t| {
                    i64::from(t.with_timezone(tz).date_naive().num_days_from_ce())
                }),
        }
    }
}

/// Accumulates candle pages, keeping the first occurrence of every key.
#[derive(Debug)]
pub struct SeriesMerger {
    key: DedupKey,
    seen: HashSet<i64>,
    candles: Vec<Candle>,
}

impl SeriesMerger {
    /// Empty merger using `key` for duplicate detection.
    #[must_use]
    pub fn new(key: DedupKey) -> Self {
        Self {
            key,
            seen: HashSet::new(),
            candles: Vec::new(),
        }
    }

    /// Add a page; returns how many candles were new.
    pub fn extend<I>(&mut self, page: I) -> usize
    where
        I: IntoIterator<Item = Candle>,
    {
        let before = self.candles.len();
        for c in page {
            if self.seen.insert(self.key.key(&c)) {
                self.candles.push(c);
            }
        }
        self.candles.len() - before
    }

    /// Number of distinct candles accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True if nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Sort ascending by `open_time` and keep the most recent `limit` candles.
    #[must_use]
    pub fn finish(mut self, limit: usize) -> Vec<Candle> {
        keep_most_recent(&mut self.candles, limit);
        self.candles
    }
}

/// Sort ascending by `open_time` and drop all but the last `limit` candles.
pub fn keep_most_recent(candles: &mut Vec<Candle>, limit: usize) {
    candles.sort_by_key(|c| c.open_time);
    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }
}

/// Merge pages into one ascending, duplicate-free series of at most `limit` candles.
///
/// Earlier pages win when the same key appears more than once.
pub fn merge_pages<I, P>(pages: I, key: DedupKey, limit: usize) -> Vec<Candle>
where
    I: IntoIterator<Item = P>,
    P: IntoIterator<Item = Candle>,
{
    let mut merger = SeriesMerger::new(key);
    for page in pages {
        merger.extend(page);
    }
    merger.finish(limit)
}

/// Normalize one upstream response: ascending, unique `open_time`, at most `limit`.
pub fn normalize_series(candles: Vec<Candle>, limit: usize) -> Vec<Candle> {
    merge_pages(std::iter::once(candles), DedupKey::OpenTime, limit)
}
