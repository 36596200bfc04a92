//! Time-series utilities shared by connectors.
//!
//! - `window`: size a calendar-date request window from a bar count
//! - `paginate`: offset-paginated fetch loop with overlap-safe accumulation
//! - `merge`: dedup, sort and truncate candle pages
/// Deduplication and normalization of candle pages.
pub mod merge;
/// Offset pagination driver.
pub mod paginate;
/// Calendar window sizing for date-windowed upstreams.
pub mod window;
