// tests/filter_search.rs
// Source selection and search behavior at the session level, on the
// bundled fixture archive (2024-01 rich month, 2024-02 small month).

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use newsstand::catalog::{Catalog, MonthKey};
use newsstand::{Article, BrowseConfig, BrowseSession, FixtureFetcher};

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn fixture_fetcher() -> FixtureFetcher {
    let catalog: Catalog = serde_json::from_str(include_str!("fixtures/catalog.json")).unwrap();
    let january: Vec<Article> =
        serde_json::from_str(include_str!("fixtures/month_2024_01.json")).unwrap();
    let february: Vec<Article> =
        serde_json::from_str(include_str!("fixtures/month_2024_02.json")).unwrap();
    FixtureFetcher::new()
        .with_catalog(catalog)
        .with_month(key("2024-01"), january)
        .with_month(key("2024-02"), february)
}

fn session_with_debounce(debounce_ms: u64) -> BrowseSession {
    let cfg = BrowseConfig {
        search_debounce_ms: debounce_ms,
        ..BrowseConfig::default()
    };
    BrowseSession::new(Arc::new(fixture_fetcher()), &cfg)
}

fn session() -> BrowseSession {
    session_with_debounce(0)
}

fn page_ids(session: &BrowseSession) -> Vec<String> {
    session
        .view()
        .page_articles
        .iter()
        .map(|a| a.id.clone())
        .collect()
}

#[tokio::test]
async fn entering_a_month_populates_an_empty_selection() {
    let s = session();
    let view = s.initialize().await.unwrap();

    assert_eq!(view.selected_month, Some(key("2024-02")));
    assert_eq!(
        view.available_sources,
        vec!["Civic Ledger", "Harbor Dispatch", "Northern Wire"]
    );
    assert_eq!(view.selected_sources, view.available_sources);
    assert_eq!(view.filtered_len, 4);
}

#[tokio::test]
async fn narrowed_selection_survives_a_month_change() {
    let s = session();
    s.initialize().await.unwrap();

    // February has three labelled sources; January adds an unlabelled one.
    s.select_month(key("2024-01")).await;
    let view = s.view();

    assert_eq!(
        view.available_sources,
        vec!["", "Civic Ledger", "Harbor Dispatch", "Northern Wire"]
    );
    assert!(
        !view.selected_sources.contains(&String::new()),
        "non-empty selection must not be repopulated"
    );
    assert_eq!(view.filtered_len, 5, "the unlabelled article stays hidden");
}

#[tokio::test]
async fn deselect_all_shows_nothing_until_the_next_month_change() {
    let s = session();
    s.initialize().await.unwrap();

    s.set_sources(BTreeSet::new());
    let view = s.view();
    assert_eq!(view.filtered_len, 0);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 1);

    // The next month change repopulates the empty selection.
    s.select_month(key("2024-01")).await;
    let view = s.view();
    assert_eq!(view.selected_sources.len(), 4);
    assert_eq!(view.filtered_len, 6);
}

#[tokio::test]
async fn toggling_a_source_hides_and_restores_its_articles() {
    let s = session();
    s.initialize().await.unwrap();
    s.select_month(key("2024-01")).await;
    s.set_sources(s.view().available_sources.into_iter().collect());

    s.toggle_source("Harbor Dispatch");
    assert_eq!(page_ids(&s), vec!["a-01", "a-02", "a-05", "a-06"]);

    s.toggle_source("Harbor Dispatch");
    assert_eq!(
        page_ids(&s),
        vec!["a-01", "a-02", "a-04", "a-05", "a-06", "a-03"]
    );
}

#[tokio::test]
async fn query_is_trimmed_and_case_folded_over_title_and_author() {
    let s = session();
    s.initialize().await.unwrap();
    s.select_month(key("2024-01")).await;

    s.set_query("  LAUNCH ");
    assert_eq!(page_ids(&s), vec!["a-02", "a-03"]);

    s.set_query("r. chen");
    assert_eq!(page_ids(&s), vec!["a-01"]);

    // Summaries are not searched.
    s.set_query("departures");
    assert_eq!(s.view().filtered_len, 0);
}

#[tokio::test]
async fn unmatched_query_still_renders_one_empty_page() {
    let s = session();
    s.initialize().await.unwrap();

    s.set_query("zzz");
    let view = s.view();
    assert_eq!(view.filtered_len, 0);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 1);
    assert!(view.page_articles.is_empty());
}

#[tokio::test]
async fn query_persists_across_a_month_change() {
    let s = session();
    s.initialize().await.unwrap();
    s.select_month(key("2024-01")).await;

    s.set_query("launch");
    assert_eq!(s.view().filtered_len, 2);

    s.select_month(key("2024-02")).await;
    let view = s.view();
    assert_eq!(view.query, "launch");
    assert_eq!(view.filtered_len, 0, "february has no launch coverage");
}

#[tokio::test(start_paused = true)]
async fn debounce_commits_only_the_latest_keystroke() {
    let s = session_with_debounce(200);
    s.initialize().await.unwrap();
    s.select_month(key("2024-01")).await;

    let (first, second) = tokio::join!(s.set_query_debounced("lau"), async {
        tokio::time::sleep(Duration::from_millis(60)).await;
        s.set_query_debounced("launch").await
    });

    assert!(!first, "overtaken keystroke must not commit");
    assert!(second);
    let view = s.view();
    assert_eq!(view.query, "launch");
    assert_eq!(view.filtered_len, 2);
}
