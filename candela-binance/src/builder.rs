use std::sync::Arc;

use candela_core::{AdapterCache, CacheConfig, CandelaError, StatsCollector};

use crate::{BinanceConnector, DEFAULT_BASE_URL};

/// Configures a [`BinanceConnector`].
#[derive(Debug, Clone)]
pub struct BinanceConnectorBuilder {
    base_url: String,
    cache: CacheConfig,
    stats: Option<Arc<StatsCollector>>,
    http: Option<reqwest::Client>,
}

impl Default for BinanceConnectorBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: CacheConfig::default(),
            stats: None,
            http: None,
        }
    }
}

impl BinanceConnectorBuilder {
    /// Override the REST root.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Cache settings.
    #[must_use]
    pub const fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cache = cfg;
        self
    }

    /// Share a statistics collector with the manager and other connectors.
    #[must_use]
    pub fn stats(mut self, stats: Arc<StatsCollector>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<BinanceConnector, CandelaError> {
        let http = match self.http {
            Some(c) => c,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| CandelaError::connector(BinanceConnector::NAME, e.to_string()))?,
        };
        Ok(BinanceConnector {
            http,
            base_url: self.base_url,
            cache: AdapterCache::new(&self.cache),
            stats: self.stats.unwrap_or_default(),
        })
    }
}

impl BinanceConnector {
    /// Start configuring a connector.
    #[must_use]
    pub fn builder() -> BinanceConnectorBuilder {
        BinanceConnectorBuilder::default()
    }
}
