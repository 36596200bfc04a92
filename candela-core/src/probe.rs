//! Telling an unknown symbol apart from an unsupported timeframe.
//!
//! An empty answer at a non-daily timeframe, or a timeframe missing from the
//! provider's table, is ambiguous. The adapter asks for a single daily bar of
//! the same symbol: if that exists the timeframe is the problem, otherwise the
//! symbol is unknown to this provider.

use crate::connector::FetchRequest;
use crate::timeframe::{DAILY_MINUTES, Timeframe, TimeframeTable};
use crate::{Candle, CandelaError};

/// Records requested by a probe.
pub const PROBE_LIMIT: usize = 1;

/// The probe to send for an ambiguous `req`: same symbol and range, daily, one bar.
#[must_use]
pub fn probe_request(req: &FetchRequest) -> FetchRequest {
    req.retarget(Timeframe::daily(), PROBE_LIMIT)
}

/// True if an empty primary answer for `req` needs a probe.
///
/// Daily requests are never probed; daily is the timeframe every provider serves.
#[must_use]
pub const fn needs_probe(req: &FetchRequest, primary_len: usize) -> bool {
    primary_len == 0 && req.timeframe.minutes() != DAILY_MINUTES
}

/// Turn a probe outcome into the adapter's answer for `req`.
///
/// A non-empty probe means the symbol exists, so the original timeframe is
/// unsupported. An empty or failed probe means the symbol is unknown and the
/// adapter returns no candles.
///
/// # Errors
/// Returns `TimeframeUnsupported` from `table` when the probe found data.
pub fn resolve_probe(
    table: &TimeframeTable,
    req: &FetchRequest,
    probe: Result<Vec<Candle>, CandelaError>,
) -> Result<Vec<Candle>, CandelaError> {
    match probe {
        Ok(found) if !found.is_empty() => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                provider = table.provider(),
                symbol = %req.symbol,
                timeframe = %req.timeframe,
                "probe found symbol; timeframe unsupported"
            );
            Err(table.unsupported(&req.timeframe, &req.symbol))
        }
        Ok(_) => Ok(Vec::new()),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                provider = table.provider(),
                symbol = %req.symbol,
                error = %_err,
                "probe failed; treating symbol as unknown"
            );
            Ok(Vec::new())
        }
    }
}
