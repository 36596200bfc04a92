use std::sync::Arc;

use chrono::{DateTime, Utc};

use candela_core::{AdapterCache, CacheConfig, CandelaError, PaginationConfig, StatsCollector};

use crate::{DEFAULT_BASE_URL, MoexConnector};

/// Configures a [`MoexConnector`].
///
/// Defaults target the TQBR board of the stock/shares market on the public
/// ISS host, with 500-record pages and a five-minute cache.
#[derive(Debug, Clone)]
pub struct MoexConnectorBuilder {
    base_url: String,
    engine: String,
    market: String,
    board: String,
    pagination: PaginationConfig,
    cache: CacheConfig,
    stats: Option<Arc<StatsCollector>>,
    http: Option<reqwest::Client>,
    clock: fn() -> DateTime<Utc>,
}

impl Default for MoexConnectorBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            engine: "stock".to_string(),
            market: "shares".to_string(),
            board: "TQBR".to_string(),
            pagination: PaginationConfig::default(),
            cache: CacheConfig::default(),
            stats: None,
            http: None,
            clock: Utc::now,
        }
    }
}

impl MoexConnectorBuilder {
    /// Override the ISS root, e.g. to point at a mirror or a test server.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Select engine, market and board.
    #[must_use]
    pub fn board(
        mut self,
        engine: impl Into<String>,
        market: impl Into<String>,
        board: impl Into<String>,
    ) -> Self {
        self.engine = engine.into();
        self.market = market.into();
        self.board = board.into();
        self
    }

    /// Records per upstream call.
    #[must_use]
    pub const fn pagination(mut self, cfg: PaginationConfig) -> Self {
        self.pagination = cfg;
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

    /// Replace the wall clock used to size date windows.
    #[must_use]
    pub const fn clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero page size and `Connector` if the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<MoexConnector, CandelaError> {
        if self.pagination.page_size == 0 {
            return Err(CandelaError::InvalidArg("page_size must be positive".into()));
        }
        let http = match self.http {
            Some(c) => c,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| CandelaError::connector(MoexConnector::NAME, e.to_string()))?,
        };
        Ok(MoexConnector {
            http,
            base_url: self.base_url,
            engine: self.engine,
            market: self.market,
            board: self.board,
            page_size: self.pagination.page_size,
            cache: AdapterCache::new(&self.cache),
            stats: self.stats.unwrap_or_default(),
            clock: self.clock,
        })
    }
}

impl MoexConnector {
    /// Start configuring a connector.
    #[must_use]
    pub fn builder() -> MoexConnectorBuilder {
        MoexConnectorBuilder::default()
    }
}
