use std::sync::Arc;

use chrono::{DateTime, Utc};

use candela_core::{AdapterCache, CacheConfig, CandelaError, StatsCollector};

use crate::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, YahooConnector};

/// Configures a [`YahooConnector`].
#[derive(Debug, Clone)]
pub struct YahooConnectorBuilder {
    base_url: String,
    user_agent: String,
    cache: CacheConfig,
    stats: Option<Arc<StatsCollector>>,
    http: Option<reqwest::Client>,
    clock: fn() -> DateTime<Utc>,
}

impl Default for YahooConnectorBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache: CacheConfig::default(),
            stats: None,
            http: None,
            clock: Utc::now,
        }
    }
}

impl YahooConnectorBuilder {
    /// Override the chart endpoint root.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
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

    /// Replace the wall clock used for open-ended explicit ranges.
    #[must_use]
    pub const fn clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<YahooConnector, CandelaError> {
        let http = match self.http {
            Some(c) => c,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| CandelaError::connector(YahooConnector::NAME, e.to_string()))?,
        };
        Ok(YahooConnector {
            http,
            base_url: self.base_url,
            user_agent: self.user_agent,
            cache: AdapterCache::new(&self.cache),
            stats: self.stats.unwrap_or_default(),
            clock: self.clock,
        })
    }
}

impl YahooConnector {
    /// Start configuring a connector.
    #[must_use]
    pub fn builder() -> YahooConnectorBuilder {
        YahooConnectorBuilder::default()
    }
}
