use serde::Deserialize;

use candela_core::{CandelaError, Candle};

/// Error code Binance returns for an unknown trading pair.
pub(crate) const INVALID_SYMBOL: i64 = -1121;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct Kline(
    i64,    // open time
    String, // open
    String, // high
    String, // low
    String, // close
    String, // volume
    i64,    // close time
    String, // quote asset volume
    i64,    // number of trades
    String, // taker buy base asset volume
    String, // taker buy quote asset volume
    String, // ignore
);

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub(crate) code: i64,
    #[serde(default)]
    pub(crate) msg: String,
}

fn price(field: &str, raw: &str) -> Result<f64, CandelaError> {
    raw.parse()
        .map_err(|_| CandelaError::Data(format!("kline {field} {raw:?} is not numeric")))
}

impl TryFrom<Kline> for Candle {
    type Error = CandelaError;

    fn try_from(k: Kline) -> Result<Self, Self::Error> {
        Ok(Self::new(
            k.0,
            price("open", &k.1)?,
            price("high", &k.2)?,
            price("low", &k.3)?,
            price("close", &k.4)?,
            price("volume", &k.5)?,
            k.6,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kline_row() {
        let row = serde_json::json!([
            1_700_000_000_000_i64, "37000.10", "37100.00", "36950.55", "37050.00", "12.5",
            1_700_003_599_999_i64, "463000.0", 1500, "6.1", "226000.0", "0"
        ]);
        let k: Kline = serde_json::from_value(row).unwrap();
        let c = Candle::try_from(k).unwrap();
        assert_eq!(c.open_time, 1_700_000_000_000);
        assert_eq!(c.close_time, 1_700_003_599_999);
        assert!((c.low - 36_950.55).abs() < 1e-9);
        assert!((c.volume - 12.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_numeric_price() {
        let row = serde_json::json!([0, "x", "1", "1", "1", "1", 1, "0", 0, "0", "0", "0"]);
        let k: Kline = serde_json::from_value(row).unwrap();
        assert!(matches!(Candle::try_from(k), Err(CandelaError::Data(_))));
    }
}
