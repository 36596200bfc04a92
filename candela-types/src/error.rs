use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candela workspace.
///
/// Two variants end a provider chain outright (`TimeframeUnsupported`,
/// `StaleData`); everything else is recoverable from the chain's point of view
/// and only surfaces to callers through the `AllProvidersFailed` aggregate.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum CandelaError {
    /// The symbol exists on the provider but the requested timeframe cannot be served.
    #[error(
        "timeframe '{timeframe}' not supported for symbol '{symbol}' by provider {provider} (supported: {})",
        .supported.join(", ")
    )]
    TimeframeUnsupported {
        /// Timeframe exactly as the caller requested it.
        timeframe: String,
        /// Symbol the request was made for.
        symbol: String,
        /// Provider that rejected the timeframe.
        provider: String,
        /// Every timeframe the provider accepts, in canonical notation.
        supported: Vec<String>,
    },

    /// The newest candle returned by a provider is older than the allowed age.
    #[error(
        "{provider} returned stale data for {symbol} {timeframe}: newest candle is {age_days:.1} days old (max {max_age_days} days)"
    )]
    StaleData {
        /// Provider that returned the stale series.
        provider: String,
        /// Symbol the request was made for.
        symbol: String,
        /// Timeframe exactly as the caller requested it.
        timeframe: String,
        /// Age of the newest candle in days.
        age_days: f64,
        /// Maximum age tolerated for this timeframe granularity.
        max_age_days: f64,
    },

    /// Every provider in the chain was tried without a qualifying result.
    #[error("all providers failed for symbol: {symbol}")]
    AllProvidersFailed {
        /// Symbol the request was made for.
        symbol: String,
    },

    /// An individual connector failed (network, HTTP status, upstream rejection).
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Malformed or unexpected upstream payload.
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

/// How a provider failure affects the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureClass {
    /// Definitive answer: the timeframe is invalid for a known symbol. Stops the chain.
    Unsupported,
    /// Definitive answer: the data is too old to be used. Stops the chain.
    Stale,
    /// Provider-specific gap or outage. The chain advances to the next provider.
    Transient,
}

impl CandelaError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `TimeframeUnsupported` error.
    pub fn timeframe_unsupported(
        timeframe: impl Into<String>,
        symbol: impl Into<String>,
        provider: impl Into<String>,
        supported: Vec<String>,
    ) -> Self {
        Self::TimeframeUnsupported {
            timeframe: timeframe.into(),
            symbol: symbol.into(),
            provider: provider.into(),
            supported,
        }
    }

    /// Helper: build an `AllProvidersFailed` error for a symbol.
    pub fn all_providers_failed(symbol: impl Into<String>) -> Self {
        Self::AllProvidersFailed {
            symbol: symbol.into(),
        }
    }

    /// Classify this error for fallback-chain handling.
    #[must_use]
    pub const fn class(&self) -> FailureClass {
        match self {
            Self::TimeframeUnsupported { .. } => FailureClass::Unsupported,
            Self::StaleData { .. } => FailureClass::Stale,
            Self::AllProvidersFailed { .. }
            | Self::Connector { .. }
            | Self::Data(_)
            | Self::InvalidArg(_)
            | Self::Other(_) => FailureClass::Transient,
        }
    }

    /// Returns true if this error must propagate out of the provider chain.
    #[must_use]
    pub const fn is_chain_terminating(&self) -> bool {
        !matches!(self.class(), FailureClass::Transient)
    }
}

impl From<serde_json::Error> for CandelaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}
