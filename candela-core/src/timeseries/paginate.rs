use std::future::Future;

use crate::timeseries::merge::{DedupKey, SeriesMerger};
use crate::{Candle, CandelaError};

/// Drive an offset-paginated upstream until `limit` distinct candles are collected.
///
/// `fetch_page` receives the record offset of each page. Offsets start at 0
/// and advance by exactly `page_size`. Paging stops once the deduplicated
/// count reaches `limit`, or a page comes back short or empty. Pages may
/// overlap; duplicates are dropped by `key`, first occurrence winning.
///
/// The result is ascending by `open_time` and holds at most `limit` candles.
///
/// # Errors
/// The first page error aborts pagination and is returned unchanged.
pub async fn fetch_paginated<F, Fut>(
    limit: usize,
    page_size: usize,
    key: DedupKey,
    mut fetch_page: F,
) -> Result<Vec<Candle>, CandelaError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<Candle>, CandelaError>>,
{
    if limit == 0 {
        return Ok(Vec::new());
    }
    let page_size = page_size.max(1);
    let mut merger = SeriesMerger::new(key);
    let mut offset = 0usize;

    loop {
        let page = fetch_page(offset).await?;
        let received = page.len();
        let added = merger.extend(page);

        #[cfg(feature = "tracing")]
        tracing::debug!(offset, received, added, total = merger.len(), "page merged");
        #[cfg(not(feature = "tracing"))]
        let _ = added;

        if received == 0 || received < page_size || merger.len() >= limit {
            break;
        }
        offset += page_size;
    }

    Ok(merger.finish(limit))
}
