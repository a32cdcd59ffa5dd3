// src/session.rs
//! # Browse Session
//! The engine façade. One `BrowseSession` owns the catalog, the month
//! cache, the filter state, paging, and the reader cursor, and recomputes
//! the derived view after every action.
//!
//! Month selection commits in two steps: the chosen key is written first,
//! the fetched articles land later. A select epoch makes the commit
//! last-initiated-wins, so an overtaken fetch never clobbers the state a
//! newer selection already produced.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::article::Article;
use crate::cache::MonthCache;
use crate::catalog::{Catalog, CatalogStore, MonthKey};
use crate::config::BrowseConfig;
use crate::debounce::SearchDebouncer;
use crate::error::Result;
use crate::fetch::{ArchiveFetcher, HttpFetcher};
use crate::filter::{apply_filters, available_sources, FilterState};
use crate::pagination::Pagination;
use crate::reader::ReaderCursor;

/// One entry of the month picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub key: MonthKey,
    pub count: u64,
    pub label: String,
}

/// Snapshot of everything a front end needs to render the session.
/// Articles are cloned for the visible page only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseView {
    pub months: Vec<MonthOption>,
    pub generated_at: Option<DateTime<Utc>>,
    pub selected_month: Option<MonthKey>,
    pub available_sources: Vec<String>,
    pub selected_sources: Vec<String>,
    pub query: String,
    pub filtered_len: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub page_articles: Vec<Article>,
    pub reader_index: Option<usize>,
    pub reader_article: Option<Article>,
}

#[derive(Debug)]
struct SessionState {
    catalog: Option<Catalog>,
    selected_month: Option<MonthKey>,
    select_epoch: u64,
    articles: Arc<Vec<Article>>,
    available_sources: Vec<String>,
    filters: FilterState,
    filtered: Vec<usize>,
    pages: Pagination,
    cursor: ReaderCursor,
}

impl SessionState {
    fn new(page_size: usize) -> Self {
        Self {
            catalog: None,
            selected_month: None,
            select_epoch: 0,
            articles: Arc::new(Vec::new()),
            available_sources: Vec::new(),
            filters: FilterState::default(),
            filtered: Vec::new(),
            pages: Pagination::new(page_size),
            cursor: ReaderCursor::default(),
        }
    }

    /// Rebuild the filtered index list from the current filters.
    fn refresh_filtered(&mut self) {
        self.filtered = apply_filters(
            &self.articles,
            &self.filters.selected_sources,
            &self.filters.query,
        );
    }

    /// Install a freshly fetched month and re-derive everything below it.
    fn commit_month(&mut self, articles: Arc<Vec<Article>>) {
        self.articles = articles;
        self.available_sources = available_sources(&self.articles);
        self.filters.sync_sources(&self.available_sources);
        self.refresh_filtered();
        self.pages.reset();
        self.cursor.close();
    }

    fn article_at_cursor(&self) -> Option<Article> {
        let slot = self.cursor.index()?;
        let idx = *self.filtered.get(slot)?;
        self.articles.get(idx).cloned()
    }
}

/// Interactive browsing over one archive. Cloning shares the session.
#[derive(Clone)]
pub struct BrowseSession {
    catalog_store: Arc<CatalogStore>,
    cache: MonthCache,
    debounce: SearchDebouncer,
    state: Arc<RwLock<SessionState>>,
}

impl BrowseSession {
    pub fn new(fetcher: Arc<dyn ArchiveFetcher>, config: &BrowseConfig) -> Self {
        Self {
            catalog_store: Arc::new(CatalogStore::new(Arc::clone(&fetcher))),
            cache: MonthCache::new(fetcher),
            debounce: SearchDebouncer::new(config.search_debounce()),
            state: Arc::new(RwLock::new(SessionState::new(config.page_size))),
        }
    }

    /// Session over HTTP against `config.base_url`.
    pub fn from_config(config: &BrowseConfig) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(&config.base_url, config.request_timeout()));
        Self::new(fetcher, config)
    }

    /// Load the catalog and enter the most recent month, if the archive has
    /// any. Errors only when the catalog itself cannot be loaded.
    pub async fn initialize(&self) -> Result<BrowseView> {
        let catalog = self.catalog_store.load().await?;
        let latest = catalog.latest_month().cloned();
        {
            let mut st = self.state.write().expect("session state poisoned");
            st.catalog = Some(catalog);
        }
        info!(month = ?latest.as_ref().map(MonthKey::as_str), "session initialized");
        if let Some(key) = latest {
            self.select_month(key).await;
        }
        Ok(self.view())
    }

    /// Switch to `key`. The selection is visible immediately; the article
    /// list, sources, paging, and reader follow once the data is in. When a
    /// newer selection starts before that, this one silently stands down.
    pub async fn select_month(&self, key: MonthKey) {
        let my_epoch = {
            let mut st = self.state.write().expect("session state poisoned");
            st.select_epoch = st.select_epoch.wrapping_add(1);
            st.selected_month = Some(key.clone());
            st.select_epoch
        };

        let articles = self.cache.get(&key).await;

        let mut st = self.state.write().expect("session state poisoned");
        if st.select_epoch != my_epoch {
            debug!(month = %key, "stale month selection dropped");
            return;
        }
        st.commit_month(articles);
        debug!(
            month = %key,
            total = st.articles.len(),
            kept = st.filtered.len(),
            "month selected"
        );
    }

    /// Replace the source selection outright. An empty set is honored as
    /// "show nothing" until the next month change repopulates it.
    pub fn set_sources(&self, sources: BTreeSet<String>) {
        let mut st = self.state.write().expect("session state poisoned");
        st.filters.selected_sources = sources;
        st.refresh_filtered();
        st.pages.reset();
        st.cursor.close();
    }

    /// Tick or untick one source.
    pub fn toggle_source(&self, source: &str) {
        let mut st = self.state.write().expect("session state poisoned");
        st.filters.toggle_source(source);
        st.refresh_filtered();
        st.pages.reset();
        st.cursor.close();
    }

    /// Commit a search query immediately.
    pub fn set_query(&self, query: &str) {
        let mut st = self.state.write().expect("session state poisoned");
        st.filters.query = query.to_string();
        st.refresh_filtered();
        st.pages.reset();
        st.cursor.close();
        debug!(query = %st.filters.query, kept = st.filtered.len(), "query committed");
    }

    /// Commit a search query after the debounce quiet period. Returns
    /// `false` when a newer keystroke arrived first and nothing changed.
    pub async fn set_query_debounced(&self, query: &str) -> bool {
        if !self.debounce.settle().await {
            return false;
        }
        self.set_query(query);
        true
    }

    /// Jump to a page, clamped into range. Returns the page landed on.
    /// Paging never touches the reader cursor.
    pub fn set_page(&self, requested: i64) -> usize {
        let mut st = self.state.write().expect("session state poisoned");
        let len = st.filtered.len();
        st.pages.set_page(requested, len)
    }

    /// Open the reader at a position in the filtered list. Out of range is
    /// a silent no-op answering `None`.
    pub fn open_reader(&self, index: usize) -> Option<Article> {
        let mut st = self.state.write().expect("session state poisoned");
        let len = st.filtered.len();
        if st.cursor.open(index, len) {
            st.article_at_cursor()
        } else {
            None
        }
    }

    /// Step the open reader by `delta` without wrapping. `None` means the
    /// cursor did not move.
    pub fn advance_reader(&self, delta: i64) -> Option<Article> {
        let mut st = self.state.write().expect("session state poisoned");
        let len = st.filtered.len();
        if st.cursor.advance(delta, len) {
            st.article_at_cursor()
        } else {
            None
        }
    }

    pub fn close_reader(&self) {
        let mut st = self.state.write().expect("session state poisoned");
        st.cursor.close();
    }

    /// Re-fetch the catalog. Months already cached stay as they are; when
    /// no month was ever selected (a recovering session), the most recent
    /// one is entered like `initialize` does.
    pub async fn reload_catalog(&self) -> Result<BrowseView> {
        let catalog = self.catalog_store.reload().await?;
        let enter = {
            let mut st = self.state.write().expect("session state poisoned");
            let need_month = st.selected_month.is_none();
            let latest = catalog.latest_month().cloned();
            st.catalog = Some(catalog);
            if need_month {
                latest
            } else {
                None
            }
        };
        if let Some(key) = enter {
            self.select_month(key).await;
        }
        Ok(self.view())
    }

    /// Render snapshot. Page bounds are clamped against the current list,
    /// so a stale page number still yields a valid slice.
    pub fn view(&self) -> BrowseView {
        let st = self.state.read().expect("session state poisoned");
        let bounds = st.pages.bounds(st.filtered.len());
        let page_articles = st.filtered[bounds.start..bounds.end]
            .iter()
            .filter_map(|&idx| st.articles.get(idx).cloned())
            .collect();
        let (months, generated_at) = match &st.catalog {
            Some(c) => (
                c.months
                    .iter()
                    .map(|k| MonthOption {
                        key: k.clone(),
                        count: c.count_for(k),
                        label: c.label(k),
                    })
                    .collect(),
                c.generated_at_time(),
            ),
            None => (Vec::new(), None),
        };
        BrowseView {
            months,
            generated_at,
            selected_month: st.selected_month.clone(),
            available_sources: st.available_sources.clone(),
            selected_sources: st.filters.selected_sources.iter().cloned().collect(),
            query: st.filters.query.clone(),
            filtered_len: st.filtered.len(),
            page: bounds.page,
            total_pages: bounds.total_pages,
            page_size: st.pages.page_size(),
            page_articles,
            reader_index: st.cursor.index(),
            reader_article: st.article_at_cursor(),
        }
    }
}
