//! Staleness check applied to a provider's successful answer.
//!
//! The newest candle's timestamp may arrive in seconds or milliseconds. The
//! unit is guessed by magnitude: values below 10^12 are taken as seconds. This
//! misreads millisecond stamps before September 2001 and second stamps after
//! the year 33658, which is accepted for market data.

use crate::timeframe::{Granularity, Timeframe};
use crate::{Candle, CandelaError, FreshnessPolicy};

/// Smallest raw timestamp treated as milliseconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Normalize a seconds-or-milliseconds timestamp to milliseconds.
#[must_use]
pub const fn normalize_epoch_ms(raw: i64) -> i64 {
    if raw >= MILLIS_THRESHOLD {
        raw
    } else {
        raw.saturating_mul(1000)
    }
}

/// Maximum tolerated age in days for a timeframe.
#[must_use]
pub const fn max_age_days(policy: &FreshnessPolicy, timeframe: &Timeframe) -> f64 {
    match timeframe.granularity() {
        Granularity::Minute => policy.minute_max_days,
        Granularity::Hour => policy.hour_max_days,
        Granularity::Day => policy.daily_max_days,
        Granularity::Week | Granularity::Month | Granularity::Other => policy.other_max_days,
    }
}

/// Age of the newest candle in days at `now_ms`, or `None` for an empty series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn newest_age_days(candles: &[Candle], now_ms: i64) -> Option<f64> {
    let newest = candles.last()?;
    let ts = normalize_epoch_ms(newest.freshness_timestamp());
    Some(now_ms.saturating_sub(ts) as f64 / MS_PER_DAY)
}

/// Reject a series whose newest candle is older than the policy allows.
///
/// Empty series pass; emptiness is handled by the caller.
///
/// # Errors
/// Returns `StaleData` naming the provider, symbol, timeframe and both ages.
pub fn check_freshness(
    provider: &str,
    symbol: &str,
    timeframe: &Timeframe,
    candles: &[Candle],
    policy: &FreshnessPolicy,
    now_ms: i64,
) -> Result<(), CandelaError> {
    let Some(age_days) = newest_age_days(candles, now_ms) else {
        return Ok(());
    };
    let max_age_days = max_age_days(policy, timeframe);
    if age_days > max_age_days {
        return Err(CandelaError::StaleData {
            provider: provider.to_string(),
            symbol: symbol.to_string(),
            timeframe: timeframe.label().to_string(),
            age_days,
            max_age_days,
        });
    }
    Ok(())
}
