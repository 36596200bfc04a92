mod support;

use candela_core::{CandelaError, DedupKey, fetch_paginated};
use support::ReversedHistory;

async fn run(history: &ReversedHistory, limit: usize) -> Result<Vec<candela_core::Candle>, CandelaError> {
    let h = history.clone();
    fetch_paginated(limit, history.page_size, DedupKey::OpenTime, move |offset| {
        let page = h.page(offset);
        async move { Ok(page) }
    })
    .await
}

#[tokio::test]
async fn limit_1000_takes_two_pages() {
    let history = ReversedHistory::new(10_000, 500, 0);
    let out = run(&history, 1000).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500]);
    assert_eq!(out, history.expected(1000));
}

#[tokio::test]
async fn limit_1250_takes_three_pages() {
    let history = ReversedHistory::new(10_000, 500, 0);
    let out = run(&history, 1250).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500, 1000]);
    assert_eq!(out.len(), 1250);
}

#[tokio::test]
async fn limit_5555_walks_through_offset_5500() {
    let history = ReversedHistory::new(10_000, 500, 0);
    let out = run(&history, 5555).await.unwrap();
    let expected: Vec<usize> = (0..12).map(|k| k * 500).collect();
    assert_eq!(history.offsets(), expected);
    assert_eq!(*expected.last().unwrap(), 5500);
    assert_eq!(out, history.expected(5555));
}

#[tokio::test]
async fn short_page_ends_history() {
    let history = ReversedHistory::new(730, 500, 0);
    let out = run(&history, 5000).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500]);
    assert_eq!(out.len(), 730);
}

#[tokio::test]
async fn empty_page_ends_history() {
    let history = ReversedHistory::new(1000, 500, 0);
    let out = run(&history, 5000).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500, 1000]);
    assert_eq!(out.len(), 1000);
}

#[tokio::test]
async fn overlapping_pages_still_fill_limit() {
    let history = ReversedHistory::new(10_000, 500, 100);
    let out = run(&history, 1000).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500, 1000]);
    assert_eq!(out, history.expected(1000));
}

#[tokio::test]
async fn every_page_repeats_its_predecessor_tail() {
    let history = ReversedHistory::new(10_000, 500, 100);
    let page1 = history.page(500);
    let page2 = history.page(1000);
    assert_eq!(page1[400..], page2[..100]);

    let history = ReversedHistory::new(10_000, 500, 100);
    let out = run(&history, 2000).await.unwrap();
    // 500 + 400 per further page
    assert_eq!(history.offsets(), vec![0, 500, 1000, 1500, 2000]);
    assert_eq!(out, history.expected(2000));
}

#[tokio::test]
async fn overlapping_tail_of_short_history() {
    let history = ReversedHistory::new(1_234, 500, 150);
    let out = run(&history, 5000).await.unwrap();
    assert_eq!(history.offsets(), vec![0, 500, 1000, 1500]);
    assert_eq!(out, history.expected(1_234));
}

#[tokio::test]
async fn page_error_aborts() {
    let err = fetch_paginated(1000, 500, DedupKey::OpenTime, |offset| async move {
        if offset == 0 {
            Ok((0..500).map(support::candle_at).collect())
        } else {
            Err(CandelaError::connector("MOEX", "HTTP 502"))
        }
    })
    .await
    .unwrap_err();
    assert_eq!(err, CandelaError::connector("MOEX", "HTTP 502"));
}

#[tokio::test]
async fn zero_limit_issues_no_calls() {
    let history = ReversedHistory::new(100, 500, 0);
    let out = run(&history, 0).await.unwrap();
    assert!(out.is_empty());
    assert!(history.offsets().is_empty());
}
