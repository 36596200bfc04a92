#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use candela_core::Candle;

pub const MINUTE_MS: i64 = 60_000;
pub const BASE_MS: i64 = 1_700_000_000_000;

pub fn candle_at(i: usize) -> Candle {
    let t = BASE_MS + i as i64 * MINUTE_MS;
    Candle::new(t, 1.0, 2.0, 0.5, 1.5, 100.0, t + MINUTE_MS - 1)
}

/// Synthetic upstream serving `total` one-minute candles newest first.
///
/// Every page after the first lands `overlap` records further back than the
/// one before, as if `overlap` new bars were published between calls. Each
/// page therefore repeats the last `overlap` records of its predecessor.
#[derive(Clone)]
pub struct ReversedHistory {
    pub total: usize,
    pub page_size: usize,
    pub overlap: usize,
    pub offsets: Arc<Mutex<Vec<usize>>>,
}

impl ReversedHistory {
    pub fn new(total: usize, page_size: usize, overlap: usize) -> Self {
        Self {
            total,
            page_size,
            overlap,
            offsets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn page(&self, offset: usize) -> Vec<Candle> {
        self.offsets.lock().unwrap().push(offset);
        let shift = offset / self.page_size.max(1) * self.overlap;
        let from = offset.saturating_sub(shift).min(self.total);
        let to = (from + self.page_size).min(self.total);
        (from..to)
            .map(|newest_rank| candle_at(self.total - 1 - newest_rank))
            .collect()
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.offsets.lock().unwrap().clone()
    }

    /// The `limit` most recent candles, ascending.
    pub fn expected(&self, limit: usize) -> Vec<Candle> {
        let n = limit.min(self.total);
        (self.total - n..self.total).map(candle_at).collect()
    }
}
