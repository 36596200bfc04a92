//! `range` token selection for the chart endpoint.
//!
//! Each bucket lists `(max bars, range)` pairs, smallest range first. Intraday
//! buckets stop at the longest range Yahoo serves for that interval.

const MINUTE_1: &[(usize, &str)] = &[(390, "1d"), (usize::MAX, "5d")];
const MINUTE_5: &[(usize, &str)] = &[(78, "1d"), (390, "5d"), (usize::MAX, "1mo")];
const MINUTE_15: &[(usize, &str)] = &[(26, "1d"), (130, "5d"), (usize::MAX, "1mo")];
const MINUTE_30: &[(usize, &str)] = &[(13, "1d"), (65, "5d"), (usize::MAX, "1mo")];
const HOUR: &[(usize, &str)] = &[
    (7, "1d"),
    (35, "5d"),
    (150, "1mo"),
    (450, "3mo"),
    (900, "6mo"),
    (usize::MAX, "1y"),
];
const MINUTE_90: &[(usize, &str)] = &[(5, "1d"), (25, "5d"), (usize::MAX, "1mo")];
const DAY: &[(usize, &str)] = &[
    (5, "5d"),
    (21, "1mo"),
    (63, "3mo"),
    (126, "6mo"),
    (252, "1y"),
    (504, "2y"),
    (1260, "5y"),
    (2520, "10y"),
    (usize::MAX, "max"),
];
const WEEK: &[(usize, &str)] = &[
    (4, "1mo"),
    (13, "3mo"),
    (26, "6mo"),
    (52, "1y"),
    (104, "2y"),
    (260, "5y"),
    (520, "10y"),
    (usize::MAX, "max"),
];
const MONTH: &[(usize, &str)] = &[
    (12, "1y"),
    (24, "2y"),
    (60, "5y"),
    (120, "10y"),
    (usize::MAX, "max"),
];

fn bucket(minutes: u32) -> &'static [(usize, &'static str)] {
    match minutes {
        0..=1 => MINUTE_1,
        2..=5 => MINUTE_5,
        6..=15 => MINUTE_15,
        16..=30 => MINUTE_30,
        31..=60 => HOUR,
        61..=240 => MINUTE_90,
        241..=1440 => DAY,
        1441..=10_080 => WEEK,
        _ => MONTH,
    }
}

/// Smallest `range` token expected to hold `limit` bars of `minutes`.
pub(crate) fn range_for(limit: usize, minutes: u32) -> &'static str {
    bucket(minutes)
        .iter()
        .find(|(max, _)| limit <= *max)
        .map_or("max", |(_, r)| r)
}
