use std::sync::Arc;

use candela::{CandleConnector, ProviderManager, StatsCollector};
use candela_binance::BinanceConnector;
use candela_mock::{MockConnector, fixtures};
use candela_moex::MoexConnector;
use candela_yahoo::YahooConnector;
use tracing_subscriber::fmt::format::FmtSpan;

fn chain(stats: &Arc<StatsCollector>) -> Result<Vec<Arc<dyn CandleConnector>>, candela::CandelaError> {
    if std::env::var("CANDELA_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Connector for CI) ---");
        let now = chrono::Utc::now().timestamp_millis();
        let mock: Arc<dyn CandleConnector> = MockConnector::builder("Mock")
            .returns(fixtures::fresh_series(200, 60, now))
            .build();
        return Ok(vec![mock]);
    }
    let moex: Arc<dyn CandleConnector> =
        Arc::new(MoexConnector::builder().stats(Arc::clone(stats)).build()?);
    let yahoo: Arc<dyn CandleConnector> =
        Arc::new(YahooConnector::builder().stats(Arc::clone(stats)).build()?);
    let binance: Arc<dyn CandleConnector> =
        Arc::new(BinanceConnector::builder().stats(Arc::clone(stats)).build()?);
    Ok(vec![moex, yahoo, binance])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,candela=debug,candela_moex=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let stats = Arc::new(StatsCollector::new());
    let manager = chain(&stats)?
        .into_iter()
        .fold(ProviderManager::builder(), |b, c| b.with_connector(c))
        .stats(Arc::clone(&stats))
        .build()?;
    println!("chain: {}", manager.providers().join(" -> "));

    for (symbol, timeframe) in [("SBER", "1h"), ("AAPL", "D"), ("BTCUSDT", "4h")] {
        match manager.fetch(symbol, timeframe, 200).await {
            Ok(res) => {
                let last = res.data.last().map(|c| c.close);
                println!(
                    "{symbol} {timeframe}: {} candles from {}, last close {last:?}",
                    res.data.len(),
                    res.provider
                );
            }
            Err(e) => println!("{symbol} {timeframe}: {e}"),
        }
    }

    // A second identical request is answered from the adapter cache.
    let _ = manager.fetch("SBER", "1h", 200).await;

    println!("{:#?}", stats.summary());
    Ok(())
}
