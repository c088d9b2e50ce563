mod common;

use std::time::Duration;

use common::{init_logging, wait_until, FakeProvider};
use dashboard_client::{DetailFetcher, Settlement};
use pretty_assertions::assert_eq;
use tokio::time::timeout;

#[tokio::test]
async fn open_publishes_all_three_facets() {
    init_logging();
    let provider = FakeProvider::new();
    let fetcher = DetailFetcher::new(provider.clone());

    assert_eq!(fetcher.open(3).await, Settlement::Committed);

    let view = fetcher.view();
    assert_eq!(view.target_id, Some(3));
    assert!(!view.is_loading);
    assert_eq!(view.meta.unwrap().url, "https://site3.example.com");
    assert_eq!(view.links.len(), 1);
    assert_eq!(view.headings[0].text, "Site 3");
    assert_eq!(view.diagnostic, None);
    assert_eq!(provider.detail_calls(3), 3);
}

#[tokio::test]
async fn failed_links_leave_other_facets_intact() {
    init_logging();
    let provider = FakeProvider::new();
    provider.fail_links(7);
    let fetcher = DetailFetcher::new(provider.clone());

    assert_eq!(fetcher.open(7).await, Settlement::Committed);

    let view = fetcher.view();
    assert!(view.links.is_empty());
    assert!(view.meta.is_some());
    assert_eq!(view.headings.len(), 1);
    assert!(!view.is_loading);
    assert!(view.diagnostic.unwrap().contains("Failed to fetch links"));
}

#[tokio::test]
async fn later_open_supersedes_earlier_one() {
    init_logging();
    let provider = FakeProvider::new();
    let gate = provider.hold_details(1);
    let fetcher = DetailFetcher::new(provider.clone());

    let first = {
        let fetcher = fetcher.clone();
        tokio::spawn(async move { fetcher.open(1).await })
    };
    wait_until(|| provider.detail_calls(1) == 3).await;
    assert_eq!(fetcher.view().target_id, Some(1));
    assert!(fetcher.view().is_loading);

    assert_eq!(fetcher.open(2).await, Settlement::Committed);
    gate.open();
    assert_eq!(first.await.unwrap(), Settlement::Superseded);

    let view = fetcher.view();
    assert_eq!(view.target_id, Some(2));
    assert_eq!(view.meta.unwrap().id, 2);
    assert_eq!(view.headings[0].text, "Site 2");
}

#[tokio::test]
async fn close_discards_pending_results() {
    init_logging();
    let provider = FakeProvider::new();
    let gate = provider.hold_details(5);
    let fetcher = DetailFetcher::new(provider.clone());
    let mut views = fetcher.subscribe();

    let pending = {
        let fetcher = fetcher.clone();
        tokio::spawn(async move { fetcher.open(5).await })
    };
    wait_until(|| provider.detail_calls(5) == 3).await;
    assert!(views.borrow_and_update().is_loading);

    fetcher.close();
    gate.open();
    assert_eq!(pending.await.unwrap(), Settlement::Superseded);

    let view = fetcher.view();
    assert!(!view.is_open());
    assert!(!view.is_loading);
    assert!(view.meta.is_none());
    assert!(view.links.is_empty());
    assert!(!views.borrow_and_update().is_open());
}

#[tokio::test(start_paused = true)]
async fn dropped_open_stops_loading() {
    init_logging();
    let provider = FakeProvider::new();
    let _gate = provider.hold_details(5);
    let fetcher = DetailFetcher::new(provider.clone());

    let attempt = timeout(Duration::from_secs(1), fetcher.open(5)).await;
    assert!(attempt.is_err());
    assert_eq!(provider.detail_calls(5), 3);

    let view = fetcher.view();
    assert_eq!(view.target_id, Some(5));
    assert!(!view.is_loading);
    assert!(view.meta.is_none());
}
