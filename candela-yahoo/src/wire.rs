//! Chart API payload.

use serde::Deserialize;

use candela_core::{CandelaError, Candle};

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartError {
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Candles in upstream order.
    ///
    /// A `Not Found` chart error means the symbol is unknown and yields no
    /// candles. Bars with any missing price or an out-of-range time are
    /// skipped; a missing volume counts as zero.
    pub(crate) fn into_candles(self, bar_minutes: u32) -> Result<Vec<Candle>, CandelaError> {
        if let Some(err) = self.chart.error {
            if err.code.eq_ignore_ascii_case("not found") {
                return Ok(Vec::new());
            }
            return Err(CandelaError::Data(format!(
                "chart error {}: {}",
                err.code,
                err.description.unwrap_or_default()
            )));
        }
        let Some(data) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let timestamps = data.timestamp.unwrap_or_default();
        let q = data
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .unwrap_or_default();

        let bar_ms = i64::from(bar_minutes) * 60_000;
        let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();
        Ok(timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let open_time = ts.checked_mul(1000)?;
                let close_time = open_time.checked_add(bar_ms - 1)?;
                Some(Candle::new(
                    open_time,
                    at(&q.open, i)?,
                    at(&q.high, i)?,
                    at(&q.low, i)?,
                    at(&q.close, i)?,
                    at(&q.volume, i).unwrap_or(0.0),
                    close_time,
                ))
            })
            .collect())
    }
}
