// src/metrics.rs
//! Metric names for the browsing engine, plus their one-time registration.
//! Recording goes through the `metrics` facade; whatever recorder the host
//! installs (or none) receives the series.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub const CATALOG_LOADS: &str = "newsstand_catalog_loads_total";
pub const MONTH_FETCH: &str = "newsstand_month_fetch_total";
pub const MONTH_CACHE_HITS: &str = "newsstand_month_cache_hits_total";
pub const MONTH_FETCH_SUPERSEDED: &str = "newsstand_month_fetch_superseded_total";
pub const MONTH_FETCH_EMPTY: &str = "newsstand_month_fetch_empty_total";
pub const MONTH_FETCH_MS: &str = "newsstand_month_fetch_ms";

/// One-time metrics registration (so series carry descriptions on export).
pub(crate) fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(CATALOG_LOADS, "Catalog index fetches (memo misses).");
        describe_counter!(MONTH_FETCH, "Month partition fetches started.");
        describe_counter!(MONTH_CACHE_HITS, "Month requests served from cache.");
        describe_counter!(
            MONTH_FETCH_SUPERSEDED,
            "Month fetch results dropped because a newer request started."
        );
        describe_counter!(
            MONTH_FETCH_EMPTY,
            "Month fetches that failed and were recorded as empty months."
        );
        describe_histogram!(MONTH_FETCH_MS, "Month fetch time in milliseconds.");
    });
}
