mod support;

use candela_core::{DedupKey, fetch_paginated};
use proptest::prelude::*;
use support::ReversedHistory;

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(fut)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn merged_series_is_recent_unique_and_sorted(
        total in 0usize..3_000,
        limit in 1usize..2_500,
        overlap in 1usize..=250,
    ) {
        let history = ReversedHistory::new(total, 500, overlap);
        let h = history.clone();
        let out = block_on(fetch_paginated(limit, 500, DedupKey::OpenTime, move |offset| {
            let page = h.page(offset);
            async move { Ok(page) }
        }))
        .unwrap();

        prop_assert_eq!(out.len(), limit.min(total));
        prop_assert!(out.windows(2).all(|w| w[0].open_time < w[1].open_time));
        prop_assert_eq!(&out, &history.expected(limit));

        let offsets = history.offsets();
        prop_assert_eq!(offsets.first().copied(), Some(0));
        prop_assert!(offsets.windows(2).all(|w| w[1] == w[0] + 500));
    }

    #[test]
    fn gapless_history_needs_ceil_pages(limit in 1usize..6_000) {
        let history = ReversedHistory::new(20_000, 500, 0);
        let h = history.clone();
        block_on(fetch_paginated(limit, 500, DedupKey::OpenTime, move |offset| {
            let page = h.page(offset);
            async move { Ok(page) }
        }))
        .unwrap();
        prop_assert_eq!(history.offsets().len(), limit.div_ceil(500));
    }
}
