//! Translate a bar count into a calendar-date window for date-windowed upstreams.
//!
//! Exchanges trade only part of each calendar day and not at all on weekends
//! or holidays, so a naive `limit * bar length` window is too short. The window
//! is first sized from an estimated calendar span per bar and then widened by a
//! timeframe-dependent multiplier.

use chrono::{DateTime, TimeDelta, Utc};

use crate::timeframe::DAILY_MINUTES;

/// Length of one trading session in minutes.
pub const TRADING_MINUTES_PER_DAY: f64 = 540.0;
/// Calendar days per trading day (weekends).
pub const WEEKEND_FACTOR: f64 = 1.4;
/// Extra days for sub-10-minute bars; the current day is published late.
pub const SHORT_BAR_DELAY_DAYS: i64 = 2;

/// Estimated calendar days covered by one bar.
#[must_use]
pub fn calendar_days_per_bar(minutes: u32) -> f64 {
    let m = f64::from(minutes);
    if minutes >= DAILY_MINUTES {
        m / f64::from(DAILY_MINUTES)
    } else {
        m / TRADING_MINUTES_PER_DAY * WEEKEND_FACTOR
    }
}

/// Widening applied on top of the per-bar estimate.
#[must_use]
pub fn window_multiplier(minutes: u32) -> f64 {
    match minutes {
        m if m >= DAILY_MINUTES => 1.4,
        m if m >= 60 => 2.4,
        m if m >= 10 => 2.2,
        _ => 2.0,
    }
}

/// Number of calendar days to look back to cover `limit` bars.
///
/// Saturates at `i64::MAX` for counts no calendar can hold.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn lookback_days(limit: usize, minutes: u32) -> i64 {
    let base = (limit as f64 * calendar_days_per_bar(minutes)).ceil();
    let widened = (base * window_multiplier(minutes)).ceil() as i64;
    if minutes < 10 {
        widened.saturating_add(SHORT_BAR_DELAY_DAYS)
    } else {
        widened
    }
}

/// Inclusive calendar window `[from, till]`.
///
/// An absent bound is left out of the upstream query, so the exchange serves
/// from the start of history or up to its latest record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day of the window.
    pub from: Option<DateTime<Utc>>,
    /// Last day of the window.
    pub till: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Window covering `limit` bars of `minutes` ending around `now`.
    ///
    /// Intraday windows end tomorrow so the running session is included.
    /// A lookback reaching past the Unix epoch drops the lower bound.
    #[must_use]
    pub fn for_bars(limit: usize, minutes: u32, now: DateTime<Utc>) -> Self {
        let from = TimeDelta::try_days(lookback_days(limit, minutes))
            .and_then(|back| now.checked_sub_signed(back))
            .filter(|from| *from >= DateTime::<Utc>::UNIX_EPOCH);
        let till = if minutes < DAILY_MINUTES {
            now.checked_add_signed(TimeDelta::days(1)).unwrap_or(now)
        } else {
            now
        };
        Self {
            from,
            till: Some(till),
        }
    }

    /// Window spanning explicit epoch-millisecond bounds.
    #[must_use]
    pub fn explicit(start: Option<i64>, end: Option<i64>) -> Self {
        Self {
            from: start.and_then(DateTime::<Utc>::from_timestamp_millis),
            till: end.and_then(DateTime::<Utc>::from_timestamp_millis),
        }
    }

    /// `from` formatted as `YYYY-MM-DD`.
    #[must_use]
    pub fn from_param(&self) -> Option<String> {
        self.from.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// `till` formatted as `YYYY-MM-DD 23:59:59`.
    #[must_use]
    pub fn till_param(&self) -> Option<String> {
        self.till.map(|d| format!("{} 23:59:59", d.format("%Y-%m-%d")))
    }
}
