use std::sync::Arc;

use candela_binance::BinanceConnector;
use candela_core::{CandelaError, CandleConnector, FailureClass, FetchRequest, StatsCollector};
use httpmock::prelude::*;
use serde_json::{Value, json};

const HOUR_MS: i64 = 3_600_000;
const FIRST_MS: i64 = 1_704_067_200_000; // 2024-01-01T00:00:00Z

fn kline(open_ms: i64, span_ms: i64) -> Value {
    json!([
        open_ms, "42000.00", "42100.00", "41900.00", "42050.00", "3.25",
        open_ms + span_ms - 1, "136662.5", 420, "1.6", "67200.0", "0"
    ])
}

fn hourly(opens: &[i64]) -> Value {
    Value::Array(opens.iter().map(|&t| kline(t, HOUR_MS)).collect())
}

fn connector(server: &MockServer, stats: Arc<StatsCollector>) -> BinanceConnector {
    BinanceConnector::builder()
        .base_url(server.base_url())
        .stats(stats)
        .build()
        .unwrap()
}

#[tokio::test]
async fn requests_klines_with_mapped_interval() {
    let server = MockServer::start_async().await;
    let opens: Vec<i64> = (0..24).map(|i| FIRST_MS + i * HOUR_MS).collect();
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/klines")
                .query_param("symbol", "BTCUSDT")
                .query_param("interval", "1h")
                .query_param("limit", "24");
            then.status(200).json_body(hourly(&opens));
        })
        .await;

    let stats = Arc::new(StatsCollector::new());
    let binance = connector(&server, Arc::clone(&stats));
    let out = binance
        .fetch(&FetchRequest::new("BTCUSDT", "60m", 24))
        .await
        .unwrap();

    m.assert_hits_async(1).await;
    assert_eq!(out.len(), 24);
    assert_eq!(out[0].open_time, FIRST_MS);
    assert_eq!(out[0].close_time, FIRST_MS + HOUR_MS - 1);
    assert!((out[23].close - 42_050.0).abs() < 1e-9);
    assert_eq!(stats.summary().by_timeframe["1h"], 1);
}

#[tokio::test]
async fn limit_is_capped_and_range_forwarded() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/klines")
                .query_param("interval", "1d")
                .query_param("limit", "1000")
                .query_param("startTime", FIRST_MS.to_string())
                .query_param("endTime", (FIRST_MS + 10 * 24 * HOUR_MS).to_string());
            then.status(200).json_body(hourly(&[FIRST_MS]));
        })
        .await;

    let binance = connector(&server, Arc::new(StatsCollector::new()));
    let req = FetchRequest::new("BTCUSDT", "D", 5000)
        .with_range(Some(FIRST_MS), Some(FIRST_MS + 10 * 24 * HOUR_MS));
    let out = binance.fetch(&req).await.unwrap();

    m.assert_hits_async(1).await;
    assert_eq!(out.len(), 1);
}

#[tokio::test]
async fn out_of_order_rows_are_normalized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(200).json_body(hourly(&[
                FIRST_MS + 2 * HOUR_MS,
                FIRST_MS,
                FIRST_MS + HOUR_MS,
                FIRST_MS,
            ]));
        })
        .await;

    let binance = connector(&server, Arc::new(StatsCollector::new()));
    let out = binance
        .fetch(&FetchRequest::new("BTCUSDT", "1h", 2))
        .await
        .unwrap();

    let times: Vec<i64> = out.iter().map(|c| c.open_time).collect();
    assert_eq!(times, vec![FIRST_MS + HOUR_MS, FIRST_MS + 2 * HOUR_MS]);
}

#[tokio::test]
async fn invalid_symbol_is_empty() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines").query_param("symbol", "NOPE");
            then.status(400)
                .json_body(json!({"code": -1121, "msg": "Invalid symbol."}));
        })
        .await;

    let binance = connector(&server, Arc::new(StatsCollector::new()));
    let out = binance
        .fetch(&FetchRequest::new("NOPE", "15m", 10))
        .await
        .unwrap();

    // primary call plus the daily probe
    m.assert_hits_async(2).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn ten_minute_bars_are_unsupported_for_known_symbol() {
    let server = MockServer::start_async().await;
    let probe = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/klines")
                .query_param("interval", "1d")
                .query_param("limit", "1");
            then.status(200).json_body(hourly(&[FIRST_MS]));
        })
        .await;

    let binance = connector(&server, Arc::new(StatsCollector::new()));
    let err = binance
        .fetch(&FetchRequest::new("BTCUSDT", "10m", 10))
        .await
        .unwrap_err();

    probe.assert_hits_async(1).await;
    assert_eq!(err.class(), FailureClass::Unsupported);
    if let CandelaError::TimeframeUnsupported { supported, .. } = err {
        assert!(supported.contains(&"15m".to_string()));
        assert!(!supported.contains(&"10m".to_string()));
    }
}

#[tokio::test]
async fn other_api_errors_are_transient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/klines");
            then.status(400)
                .json_body(json!({"code": -1100, "msg": "Illegal characters found."}));
        })
        .await;

    let binance = connector(&server, Arc::new(StatsCollector::new()));
    let err = binance
        .fetch(&FetchRequest::new("BTC USDT", "D", 10))
        .await
        .unwrap_err();

    assert_eq!(err.class(), FailureClass::Transient);
    assert!(err.to_string().contains("-1100"));
}
