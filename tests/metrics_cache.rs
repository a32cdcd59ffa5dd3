// tests/metrics_cache.rs
// Counter behavior of the catalog store and month cache, observed through
// a debugging recorder installed for this process.

use std::sync::Arc;
use std::time::Duration;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use newsstand::catalog::MonthKey;
use newsstand::metrics::{
    CATALOG_LOADS, MONTH_CACHE_HITS, MONTH_FETCH, MONTH_FETCH_EMPTY, MONTH_FETCH_MS,
    MONTH_FETCH_SUPERSEDED,
};
use newsstand::{Article, Catalog, CatalogStore, FixtureFetcher, MonthCache};

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn article(id: &str) -> Article {
    Article {
        id: id.to_string(),
        title: id.to_string(),
        source: "Wire".to_string(),
        published_at: "2024-01-10T08:00:00+00:00".to_string(),
        ..Article::default()
    }
}

#[tokio::test(start_paused = true)]
async fn cache_flow_increments_the_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("install debugging recorder");

    let fx = Arc::new(
        FixtureFetcher::new()
            .with_catalog(Catalog::default())
            .with_month(key("2024-01"), vec![article("a-01")])
            .with_month(key("2024-03"), vec![article("c-01")])
            .with_month(key("2024-04"), vec![article("d-01")])
            .with_month_latency(key("2024-03"), Duration::from_millis(300)),
    );

    // 1) Catalog: one fetch, then a memo hit.
    let store = CatalogStore::new(fx.clone());
    store.load().await.unwrap();
    store.load().await.unwrap();

    // 2) Months: miss, hit, failed fetch recorded as empty.
    let cache = MonthCache::new(fx.clone());
    cache.get(&key("2024-01")).await;
    cache.get(&key("2024-01")).await;
    cache.get(&key("2024-02")).await;

    // 3) A slow fetch overtaken by a fast one. The key outlives the join
    // because the pinned future borrows it.
    let mar = key("2024-03");
    tokio::join!(cache.get(&mar), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.get(&key("2024-04")).await;
    });

    let entries = snapshotter.snapshot().into_vec();
    let counter = |name: &str| -> u64 {
        entries
            .iter()
            .find(|(k, _, _, _)| k.key().name() == name)
            .map(|(_, _, _, v)| match v {
                DebugValue::Counter(c) => *c,
                other => panic!("{name} is not a counter: {other:?}"),
            })
            .unwrap_or(0)
    };

    assert_eq!(counter(CATALOG_LOADS), 1);
    assert_eq!(counter(MONTH_FETCH), 4, "jan, missing feb, slow mar, apr");
    assert_eq!(counter(MONTH_CACHE_HITS), 1);
    assert_eq!(counter(MONTH_FETCH_EMPTY), 1);
    assert_eq!(counter(MONTH_FETCH_SUPERSEDED), 1);

    let timed = entries
        .iter()
        .find(|(k, _, _, _)| k.key().name() == MONTH_FETCH_MS);
    assert!(
        matches!(timed, Some((_, _, _, DebugValue::Histogram(samples))) if !samples.is_empty()),
        "fetch timings were not recorded"
    );
}
