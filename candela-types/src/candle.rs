//! Canonical OHLCV candle shared by every connector.

use serde::{Deserialize, Serialize};

/// One OHLCV bar in canonical form.
///
/// Timestamps are epoch milliseconds (UTC). Within any series returned to a
/// caller, `open_time` is strictly increasing and unique.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bar open time, epoch milliseconds.
    pub open_time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest traded price.
    pub high: f64,
    /// Lowest traded price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume in base units.
    pub volume: f64,
    /// Bar close time, epoch milliseconds.
    pub close_time: i64,
    /// Upstream-native bar timestamp, in seconds or milliseconds.
    ///
    /// Some shims report the bar time in the source's own unit. When present it
    /// takes precedence over `close_time` for freshness checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl Candle {
    /// Construct a candle without an upstream-native timestamp.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
            time: None,
        }
    }

    /// Attach an upstream-native timestamp (seconds or milliseconds).
    #[must_use]
    pub const fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Raw timestamp used to judge how recent this candle is.
    ///
    /// Returns `time` when present, otherwise `close_time`. The unit is not
    /// normalized here.
    #[must_use]
    pub const fn freshness_timestamp(&self) -> i64 {
        match self.time {
            Some(t) => t,
            None => self.close_time,
        }
    }
}
