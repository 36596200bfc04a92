use std::sync::Arc;

use candela_core::{CandelaError, CandleConnector, FailureClass, FetchRequest, StatsCollector};
use candela_yahoo::{DEFAULT_USER_AGENT, YahooConnector};
use chrono::{DateTime, TimeZone, Utc};
use httpmock::prelude::*;
use serde_json::{Value, json};

const DAY_S: i64 = 86_400;
const FIRST_TS: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn chart(timestamps: &[i64]) -> Value {
    let n = timestamps.len();
    json!({
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": timestamps,
                "indicators": {"quote": [{
                    "open": vec![10.0; n],
                    "high": vec![11.0; n],
                    "low": vec![9.0; n],
                    "close": vec![10.5; n],
                    "volume": vec![1000; n]
                }]}
            }],
            "error": null
        }
    })
}

fn daily(n: i64) -> Vec<i64> {
    (0..n).map(|i| FIRST_TS + i * DAY_S).collect()
}

fn connector(server: &MockServer, stats: Arc<StatsCollector>) -> YahooConnector {
    YahooConnector::builder()
        .base_url(server.base_url())
        .stats(stats)
        .clock(fixed_now)
        .build()
        .unwrap()
}

#[tokio::test]
async fn sends_interval_range_and_agent() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/AAPL")
                .query_param("interval", "1d")
                .query_param("range", "6mo")
                .header("user-agent", DEFAULT_USER_AGENT);
            then.status(200).json_body(chart(&daily(120)));
        })
        .await;

    let stats = Arc::new(StatsCollector::new());
    let yahoo = connector(&server, Arc::clone(&stats));
    let out = yahoo.fetch(&FetchRequest::new("AAPL", "D", 100)).await.unwrap();

    m.assert_hits_async(1).await;
    assert_eq!(out.len(), 100);
    assert_eq!(out[99].open_time, (FIRST_TS + 119 * DAY_S) * 1000);
    assert!(out.windows(2).all(|w| w[0].open_time < w[1].open_time));
    assert_eq!(stats.summary().by_timeframe["D"], 1);
}

#[tokio::test]
async fn explicit_range_uses_periods() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/AAPL")
                .query_param("interval", "1wk")
                .query_param("period1", "1704067200")
                .query_param("period2", "1710504000");
            then.status(200).json_body(chart(&[FIRST_TS, FIRST_TS + 7 * DAY_S]));
        })
        .await;

    let yahoo = connector(&server, Arc::new(StatsCollector::new()));
    let req = FetchRequest::new("AAPL", "W", 10).with_range(Some(FIRST_TS * 1000), None);
    let out = yahoo.fetch(&req).await.unwrap();

    m.assert_hits_async(1).await;
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].close_time, FIRST_TS * 1000 + 10_080 * 60_000 - 1);
}

#[tokio::test]
async fn unsorted_duplicated_upstream_is_normalized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/AAPL");
            then.status(200)
                .json_body(chart(&[FIRST_TS + DAY_S, FIRST_TS, FIRST_TS + DAY_S]));
        })
        .await;

    let yahoo = connector(&server, Arc::new(StatsCollector::new()));
    let out = yahoo.fetch(&FetchRequest::new("AAPL", "D", 10)).await.unwrap();

    let times: Vec<i64> = out.iter().map(|c| c.open_time).collect();
    assert_eq!(times, vec![FIRST_TS * 1000, (FIRST_TS + DAY_S) * 1000]);
}

#[tokio::test]
async fn four_hour_bars_are_unsupported_for_known_symbol() {
    let server = MockServer::start_async().await;
    let probe = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/AAPL")
                .query_param("interval", "1d")
                .query_param("range", "5d");
            then.status(200).json_body(chart(&daily(1)));
        })
        .await;

    let yahoo = connector(&server, Arc::new(StatsCollector::new()));
    let err = yahoo
        .fetch(&FetchRequest::new("AAPL", "4h", 50))
        .await
        .unwrap_err();

    probe.assert_hits_async(1).await;
    assert_eq!(err.class(), FailureClass::Unsupported);
    if let CandelaError::TimeframeUnsupported {
        provider, supported, ..
    } = err
    {
        assert_eq!(provider, "YahooFinance");
        assert!(supported.contains(&"90m".to_string()));
        assert!(!supported.contains(&"4h".to_string()));
    }
}

#[tokio::test]
async fn unknown_symbol_404_is_empty() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/NOPE");
            then.status(404).json_body(json!({
                "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}
            }));
        })
        .await;

    let yahoo = connector(&server, Arc::new(StatsCollector::new()));
    let out = yahoo.fetch(&FetchRequest::new("NOPE", "1h", 50)).await.unwrap();

    // primary call plus the daily probe
    m.assert_hits_async(2).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn server_error_is_transient() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/AAPL");
            then.status(429);
        })
        .await;

    let yahoo = connector(&server, Arc::new(StatsCollector::new()));
    let err = yahoo.fetch(&FetchRequest::new("AAPL", "D", 5)).await.unwrap_err();
    assert_eq!(err.class(), FailureClass::Transient);
}

#[tokio::test]
async fn cached_answer_skips_upstream() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET).path("/AAPL");
            then.status(200).json_body(chart(&daily(5)));
        })
        .await;

    let stats = Arc::new(StatsCollector::new());
    let yahoo = connector(&server, Arc::clone(&stats));
    let req = FetchRequest::new("AAPL", "D", 5);
    yahoo.fetch(&req).await.unwrap();
    yahoo.fetch(&req).await.unwrap();

    m.assert_hits_async(1).await;
    assert_eq!(stats.summary().by_provider["YahooFinance"].cache_hits, 1);
}
