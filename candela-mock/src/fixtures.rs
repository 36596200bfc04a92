//! Deterministic candle series.

use candela_core::Candle;

const MINUTE_MS: i64 = 60_000;

/// `n` contiguous bars of `minutes` each, the last one opening at `last_open_ms`.
///
/// Prices walk up by one per bar from 100 so series are easy to tell apart in
/// assertions.
#[must_use]
pub fn series(n: usize, minutes: u32, last_open_ms: i64) -> Vec<Candle> {
    let step = i64::from(minutes) * MINUTE_MS;
    let n_i = i64::try_from(n).unwrap_or(i64::MAX);
    (0..n_i)
        .map(|i| {
            let open_time = last_open_ms - (n_i - 1 - i) * step;
            #[allow(clippy::cast_precision_loss)]
            let base = 100.0 + i as f64;
            Candle::new(
                open_time,
                base,
                base + 1.0,
                base - 1.0,
                base + 0.5,
                1_000.0,
                open_time + step - 1,
            )
        })
        .collect()
}

/// `n` bars whose newest bar closes right at `now_ms`.
#[must_use]
pub fn fresh_series(n: usize, minutes: u32, now_ms: i64) -> Vec<Candle> {
    let step = i64::from(minutes) * MINUTE_MS;
    series(n, minutes, now_ms - step + 1)
}

/// `n` bars whose newest bar closed `age_days` before `now_ms`.
#[must_use]
pub fn aged_series(n: usize, minutes: u32, now_ms: i64, age_days: i64) -> Vec<Candle> {
    fresh_series(n, minutes, now_ms - age_days * 86_400_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_is_contiguous_and_ascending() {
        let s = series(3, 60, 10 * 3_600_000);
        let opens: Vec<i64> = s.iter().map(|c| c.open_time).collect();
        assert_eq!(opens, vec![8 * 3_600_000, 9 * 3_600_000, 10 * 3_600_000]);
        assert_eq!(s[2].close_time, 11 * 3_600_000 - 1);
    }

    #[test]
    fn fresh_series_closes_at_now() {
        let now = 1_710_000_000_000;
        let s = fresh_series(5, 1440, now);
        assert_eq!(s.last().unwrap().close_time, now);
    }

    #[test]
    fn empty_when_zero() {
        assert!(series(0, 1, 0).is_empty());
    }
}
