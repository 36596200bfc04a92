//! ISS `candles.json` payload and its conversion into canonical candles.

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Europe::Moscow;
use serde::Deserialize;
use serde_json::Value;

use candela_core::{CandelaError, Candle};

const ISS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column order ISS uses when `columns` is absent.
const DEFAULT_COLUMNS: [&str; 8] = [
    "open", "close", "high", "low", "value", "volume", "begin", "end",
];

#[derive(Debug, Deserialize)]
pub(crate) struct IssResponse {
    #[serde(default)]
    candles: Option<IssTable>,
}

#[derive(Debug, Deserialize)]
struct IssTable {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

struct Layout {
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    begin: usize,
    end: usize,
}

impl Layout {
    fn resolve(columns: &[String]) -> Result<Self, CandelaError> {
        let find = |name: &str| -> Result<usize, CandelaError> {
            if columns.is_empty() {
                return DEFAULT_COLUMNS
                    .iter()
                    .position(|c| *c == name)
                    .ok_or_else(|| CandelaError::Data(format!("ISS column {name} unknown")));
            }
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| CandelaError::Data(format!("ISS response lacks column {name}")))
        };
        Ok(Self {
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
            begin: find("begin")?,
            end: find("end")?,
        })
    }
}

fn number(row: &[Value], idx: usize) -> Result<f64, CandelaError> {
    match row.get(idx) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CandelaError::Data(format!("ISS value {n} out of range"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| CandelaError::Data(format!("ISS value {s:?} is not numeric"))),
        other => Err(CandelaError::Data(format!(
            "ISS numeric column {idx} holds {other:?}"
        ))),
    }
}

/// Exchange-local `YYYY-MM-DD HH:MM:SS` to UTC epoch milliseconds.
pub(crate) fn moscow_millis(stamp: &str) -> Result<i64, CandelaError> {
    let naive = NaiveDateTime::parse_from_str(stamp.trim(), ISS_TIME_FORMAT)
        .map_err(|e| CandelaError::Data(format!("ISS timestamp {stamp:?}: {e}")))?;
    Moscow
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.timestamp_millis())
        .ok_or_else(|| CandelaError::Data(format!("ISS timestamp {stamp:?} does not exist")))
}

fn timestamp(row: &[Value], idx: usize) -> Result<i64, CandelaError> {
    match row.get(idx) {
        Some(Value::String(s)) => moscow_millis(s),
        other => Err(CandelaError::Data(format!(
            "ISS time column {idx} holds {other:?}"
        ))),
    }
}

impl IssResponse {
    /// Convert the table into candles in upstream order.
    pub(crate) fn into_candles(self) -> Result<Vec<Candle>, CandelaError> {
        let Some(table) = self.candles else {
            return Ok(Vec::new());
        };
        if table.data.is_empty() {
            return Ok(Vec::new());
        }
        let l = Layout::resolve(&table.columns)?;
        table
            .data
            .iter()
            .map(|row| -> Result<Candle, CandelaError> {
                Ok(Candle::new(
                    timestamp(row, l.begin)?,
                    number(row, l.open)?,
                    number(row, l.high)?,
                    number(row, l.low)?,
                    number(row, l.close)?,
                    number(row, l.volume)?,
                    timestamp(row, l.end)?,
                ))
            })
            .collect()
    }
}
