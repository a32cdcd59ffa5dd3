// src/cache.rs
//! # Month Cache
//! Memoizes month partitions as `Arc<Vec<Article>>` so repeated visits to a
//! month never refetch. A generation counter tracks the most recent request:
//! when a fetch lands after a newer one started, its result is discarded as
//! an empty month and not memoized, so the month refetches cleanly next
//! time it is selected.
//!
//! Fetch failures are not errors here. A missing or broken partition becomes
//! an empty month and the session keeps browsing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics::{counter, histogram};
use tracing::{debug, warn};

use crate::article::{sort_newest_first, Article};
use crate::catalog::MonthKey;
use crate::fetch::ArchiveFetcher;
use crate::metrics::{
    MONTH_CACHE_HITS, MONTH_FETCH, MONTH_FETCH_EMPTY, MONTH_FETCH_MS, MONTH_FETCH_SUPERSEDED,
};

/// Shared month store. Clones see the same entries and generation counter.
#[derive(Clone)]
pub struct MonthCache {
    fetcher: Arc<dyn ArchiveFetcher>,
    entries: Arc<Mutex<HashMap<MonthKey, Arc<Vec<Article>>>>>,
    generation: Arc<AtomicU64>,
}

impl MonthCache {
    pub fn new(fetcher: Arc<dyn ArchiveFetcher>) -> Self {
        crate::metrics::ensure_described();
        Self {
            fetcher,
            entries: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Articles for `key`, newest first.
    ///
    /// Cache hits return the stored `Arc` without touching the generation
    /// counter. A miss fetches; whichever fetch was initiated last wins, and
    /// an overtaken fetch resolves to an empty month that is not stored.
    pub async fn get(&self, key: &MonthKey) -> Arc<Vec<Article>> {
        if let Some(found) = self
            .entries
            .lock()
            .expect("month cache poisoned")
            .get(key)
        {
            counter!(MONTH_CACHE_HITS).increment(1);
            debug!(month = %key, "month served from cache");
            return Arc::clone(found);
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        counter!(MONTH_FETCH).increment(1);
        let t0 = std::time::Instant::now();
        let fetched = self.fetcher.fetch_month(key).await;
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!(MONTH_FETCH_MS).record(ms);

        if self.generation.load(Ordering::SeqCst) != my_generation {
            counter!(MONTH_FETCH_SUPERSEDED).increment(1);
            debug!(month = %key, "month fetch superseded, result dropped");
            return Arc::new(Vec::new());
        }

        let articles = match fetched {
            Ok(mut articles) => {
                sort_newest_first(&mut articles);
                articles
            }
            Err(e) => {
                warn!(month = %key, error = %e, "month fetch failed, treating as empty");
                counter!(MONTH_FETCH_EMPTY).increment(1);
                Vec::new()
            }
        };

        let shared = Arc::new(articles);
        self.entries
            .lock()
            .expect("month cache poisoned")
            .insert(key.clone(), Arc::clone(&shared));
        debug!(month = %key, count = shared.len(), "month cached");
        shared
    }

    /// Whether `key` has a memoized result (including memoized-empty).
    pub fn is_cached(&self, key: &MonthKey) -> bool {
        self.entries
            .lock()
            .expect("month cache poisoned")
            .contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FixtureFetcher;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn art(id: &str, published_at: &str) -> Article {
        Article {
            id: id.to_string(),
            published_at: published_at.to_string(),
            ..Article::default()
        }
    }

    #[tokio::test]
    async fn second_get_reuses_the_stored_allocation() {
        let fx = Arc::new(FixtureFetcher::new().with_month(
            key("2024-01"),
            vec![art("a", "2024-01-02T00:00:00+00:00")],
        ));
        let cache = MonthCache::new(fx.clone());

        let first = cache.get(&key("2024-01")).await;
        let second = cache.get(&key("2024-01")).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fx.month_calls(&key("2024-01")), 1);
    }

    #[tokio::test]
    async fn fetched_month_is_sorted_newest_first() {
        let fx = Arc::new(FixtureFetcher::new().with_month(
            key("2024-01"),
            vec![
                art("old", "2024-01-01T00:00:00+00:00"),
                art("new", "2024-01-20T00:00:00+00:00"),
                art("undated", ""),
            ],
        ));
        let cache = MonthCache::new(fx);

        let got = cache.get(&key("2024-01")).await;
        let ids: Vec<&str> = got.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }

    #[tokio::test]
    async fn missing_month_memoizes_as_empty() {
        let fx = Arc::new(FixtureFetcher::new());
        let cache = MonthCache::new(fx.clone());

        let got = cache.get(&key("2024-05")).await;
        assert!(got.is_empty());
        assert!(cache.is_cached(&key("2024-05")));

        // The empty result is served from the cache, no second fetch.
        cache.get(&key("2024-05")).await;
        assert_eq!(fx.month_calls(&key("2024-05")), 1);
    }
}
