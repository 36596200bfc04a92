//! Timeframe canonicalization and per-provider interval tables.
//!
//! Every timeframe expression is reduced to a canonical minute count. Accepted
//! forms are a plain integer (already minutes), `"<digits><unit>"` with unit
//! `m`, `h` or `d`, and the bare letters `D`, `W`, `M`. The letters take no
//! digit prefix, so `"1D"` is not recognized. Anything unrecognized resolves
//! to daily (1440 minutes) instead of failing.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::CandelaError;

/// Minutes in one day. Also the fallback for unparseable input.
pub const DAILY_MINUTES: u32 = 1440;
/// Minutes in one week.
pub const WEEKLY_MINUTES: u32 = 10_080;
/// Minutes in one (30-day) month.
pub const MONTHLY_MINUTES: u32 = 43_200;

/// Parse a timeframe expression into canonical minutes.
///
/// Never fails: unrecognized input yields [`DAILY_MINUTES`].
#[must_use]
pub fn parse_minutes(expr: &str) -> u32 {
    match expr {
        "D" => return DAILY_MINUTES,
        "W" => return WEEKLY_MINUTES,
        "M" => return MONTHLY_MINUTES,
        _ => {}
    }

    let Some(unit) = expr.chars().last() else {
        return DAILY_MINUTES;
    };
    let digits = &expr[..expr.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return DAILY_MINUTES;
    }
    let Ok(value) = digits.parse::<u32>() else {
        return DAILY_MINUTES;
    };
    let scale = match unit {
        'm' => 1,
        'h' => 60,
        'd' => DAILY_MINUTES,
        _ => return DAILY_MINUTES,
    };
    match value.checked_mul(scale) {
        Some(m) if m > 0 => m,
        _ => DAILY_MINUTES,
    }
}

/// Render canonical minutes in the canonical vocabulary (`"15m"`, `"4h"`, `"D"`, ...).
#[must_use]
pub fn canonical_label(minutes: u32) -> String {
    match minutes {
        DAILY_MINUTES => "D".to_string(),
        WEEKLY_MINUTES => "W".to_string(),
        MONTHLY_MINUTES => "M".to_string(),
        m if m >= 60 && m % 60 == 0 => format!("{}h", m / 60),
        m => format!("{m}m"),
    }
}

/// Coarse bucket of a timeframe, used for freshness thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Below one hour.
    Minute,
    /// One hour up to (excluding) one day.
    Hour,
    /// Exactly one day.
    Day,
    /// Exactly one week.
    Week,
    /// Exactly one month.
    Month,
    /// Multi-day bars that are neither weekly nor monthly.
    Other,
}

impl Granularity {
    /// Classify canonical minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        match minutes {
            0..60 => Self::Minute,
            60..DAILY_MINUTES => Self::Hour,
            DAILY_MINUTES => Self::Day,
            WEEKLY_MINUTES => Self::Week,
            MONTHLY_MINUTES => Self::Month,
            _ => Self::Other,
        }
    }
}

/// A requested timeframe: the caller's expression plus its canonical minutes.
///
/// Equality and hashing consider only the canonical minutes, so `"1h"` and
/// `60` are the same timeframe.
#[derive(Debug, Clone)]
pub struct Timeframe {
    label: String,
    minutes: u32,
}

impl Timeframe {
    /// Parse an expression such as `"15m"`, `"4h"`, `"1d"` or `"W"`.
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        Self {
            label: expr.to_string(),
            minutes: parse_minutes(expr),
        }
    }

    /// Use an integer minute count as-is. Zero falls back to daily.
    #[must_use]
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            label: minutes.to_string(),
            minutes: if minutes == 0 { DAILY_MINUTES } else { minutes },
        }
    }

    /// The daily timeframe, which every provider serves.
    #[must_use]
    pub fn daily() -> Self {
        Self::parse("D")
    }

    /// Canonical minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// The expression exactly as the caller supplied it.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Granularity bucket of this timeframe.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        Granularity::from_minutes(self.minutes)
    }

    /// True for bars of one day or longer.
    #[must_use]
    pub const fn is_daily_or_longer(&self) -> bool {
        self.minutes >= DAILY_MINUTES
    }
}

impl PartialEq for Timeframe {
    fn eq(&self, other: &Self) -> bool {
        self.minutes == other.minutes
    }
}

impl Eq for Timeframe {}

impl Hash for Timeframe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.minutes.hash(state);
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<&str> for Timeframe {
    fn from(expr: &str) -> Self {
        Self::parse(expr)
    }
}

impl From<String> for Timeframe {
    fn from(expr: String) -> Self {
        Self::parse(&expr)
    }
}

impl From<u32> for Timeframe {
    fn from(minutes: u32) -> Self {
        Self::from_minutes(minutes)
    }
}

/// Hand-curated mapping from canonical minutes to one provider's interval tokens.
///
/// Tables differ between providers on purpose; a timeframe missing from a
/// table is unsupported by that provider even if another provider serves it.
#[derive(Debug, Clone, Copy)]
pub struct TimeframeTable {
    provider: &'static str,
    entries: &'static [(u32, &'static str)],
}

impl TimeframeTable {
    /// Build a table from `(minutes, token)` pairs.
    #[must_use]
    pub const fn new(provider: &'static str, entries: &'static [(u32, &'static str)]) -> Self {
        Self { provider, entries }
    }

    /// Provider name used in error payloads.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Native token for `minutes`, if the provider supports it.
    #[must_use]
    pub fn token(&self, minutes: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(m, _)| *m == minutes)
            .map(|(_, t)| *t)
    }

    /// True if the provider serves `minutes`.
    #[must_use]
    pub fn supports(&self, minutes: u32) -> bool {
        self.token(minutes).is_some()
    }

    /// Supported canonical minute counts, in table order.
    pub fn supported_minutes(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    /// Supported timeframes rendered in the canonical vocabulary.
    #[must_use]
    pub fn supported_labels(&self) -> Vec<String> {
        self.supported_minutes().map(canonical_label).collect()
    }

    /// Build the `TimeframeUnsupported` error for a request against this table.
    #[must_use]
    pub fn unsupported(&self, timeframe: &Timeframe, symbol: &str) -> CandelaError {
        CandelaError::timeframe_unsupported(
            timeframe.label(),
            symbol,
            self.provider,
            self.supported_labels(),
        )
    }

    /// Convert a timeframe into this provider's token.
    ///
    /// # Errors
    /// Returns `TimeframeUnsupported` carrying the requested timeframe, the
    /// provider name, and the full supported list when `timeframe` is absent
    /// from the table.
    pub fn to_provider_token(
        &self,
        timeframe: &Timeframe,
        symbol: &str,
    ) -> Result<&'static str, CandelaError> {
        self.token(timeframe.minutes())
            .ok_or_else(|| self.unsupported(timeframe, symbol))
    }
}

/// MOEX ISS candle intervals.
pub const MOEX_TIMEFRAMES: TimeframeTable = TimeframeTable::new(
    "MOEX",
    &[
        (1, "1"),
        (10, "10"),
        (60, "60"),
        (DAILY_MINUTES, "24"),
        (WEEKLY_MINUTES, "7"),
        (MONTHLY_MINUTES, "31"),
    ],
);

/// Yahoo chart intervals.
pub const YAHOO_TIMEFRAMES: TimeframeTable = TimeframeTable::new(
    "YahooFinance",
    &[
        (1, "1m"),
        (2, "2m"),
        (5, "5m"),
        (15, "15m"),
        (30, "30m"),
        (60, "1h"),
        (90, "90m"),
        (DAILY_MINUTES, "1d"),
        (WEEKLY_MINUTES, "1wk"),
        (MONTHLY_MINUTES, "1mo"),
    ],
);

/// Binance kline intervals.
pub const BINANCE_TIMEFRAMES: TimeframeTable = TimeframeTable::new(
    "Binance",
    &[
        (1, "1m"),
        (3, "3m"),
        (5, "5m"),
        (15, "15m"),
        (30, "30m"),
        (60, "1h"),
        (120, "2h"),
        (240, "4h"),
        (360, "6h"),
        (480, "8h"),
        (720, "12h"),
        (DAILY_MINUTES, "1d"),
        (WEEKLY_MINUTES, "1w"),
        (MONTHLY_MINUTES, "1M"),
    ],
);
