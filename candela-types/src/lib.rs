//! Candela data transfer objects, error taxonomy, and configuration primitives.
#![warn(missing_docs)]

mod candle;
mod config;
mod error;

pub use candle::Candle;
pub use config::{CacheConfig, CandelaConfig, FreshnessPolicy, PaginationConfig};
pub use error::{CandelaError, FailureClass};
