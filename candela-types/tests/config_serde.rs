use std::time::Duration;

use candela_types::{CacheConfig, CandelaConfig, FreshnessPolicy, PaginationConfig};

#[test]
fn defaults_match_documented_constants() {
    let cfg = CandelaConfig::default();
    assert_eq!(cfg.cache.ttl, Duration::from_millis(300_000));
    assert!(cfg.cache.is_enabled());
    assert_eq!(cfg.pagination.page_size, 500);
    assert_eq!(cfg.freshness.minute_max_days, 1.0);
    assert_eq!(cfg.freshness.hour_max_days, 2.0);
    assert_eq!(cfg.freshness.daily_max_days, 7.0);
    assert_eq!(cfg.freshness.other_max_days, 30.0);
}

#[test]
fn zero_ttl_disables_cache() {
    let cfg = CacheConfig::default().with_ttl(Duration::ZERO);
    assert!(!cfg.is_enabled());
    assert!(!CacheConfig::disabled().is_enabled());
}

#[test]
fn config_roundtrip() {
    let cfg = CandelaConfig {
        cache: CacheConfig::default().with_ttl(Duration::from_secs(42)),
        pagination: PaginationConfig { page_size: 100 },
        freshness: FreshnessPolicy {
            daily_max_days: 3.5,
            ..FreshnessPolicy::default()
        },
    };

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: CandelaConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de, cfg);
    assert_eq!(de.cache.ttl.as_secs(), 42);
}
