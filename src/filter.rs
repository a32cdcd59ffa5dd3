// src/filter.rs
//! Source selection and text search over one month of articles.
//!
//! Filtering works on indices into the month's article list so the list
//! itself stays shared and uncloned; pagination and the reader cursor both
//! address articles through the filtered index vector.

use std::collections::BTreeSet;

use crate::article::Article;

/// The user-held filter state: which sources are ticked and the raw search
/// box contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub selected_sources: BTreeSet<String>,
    pub query: String,
}

impl FilterState {
    /// Reconcile the selection with a new month's source list. An empty
    /// selection is populated with every available source; a non-empty one
    /// is left untouched, stale entries included (they match nothing).
    pub fn sync_sources(&mut self, available: &[String]) {
        if self.selected_sources.is_empty() {
            self.selected_sources = available.iter().cloned().collect();
        }
    }

    /// Tick or untick one source.
    pub fn toggle_source(&mut self, source: &str) {
        if !self.selected_sources.remove(source) {
            self.selected_sources.insert(source.to_string());
        }
    }
}

/// Distinct source names in `articles`, ascending. `""` is listed when
/// records carry no source, so malformed entries stay reachable.
pub fn available_sources(articles: &[Article]) -> Vec<String> {
    let set: BTreeSet<&str> = articles.iter().map(|a| a.source.as_str()).collect();
    set.into_iter().map(str::to_string).collect()
}

/// Indices of `articles` passing the source selection and the query, in
/// input order. An empty selection keeps nothing. The query is trimmed and
/// matched case-insensitively as a substring of `"{title} {author}"`; a
/// blank query keeps everything the selection allows.
pub fn apply_filters(
    articles: &[Article],
    selected: &BTreeSet<String>,
    query: &str,
) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    articles
        .iter()
        .enumerate()
        .filter(|(_, a)| selected.contains(&a.source))
        .filter(|(_, a)| {
            if needle.is_empty() {
                return true;
            }
            format!("{} {}", a.title, a.author)
                .to_lowercase()
                .contains(&needle)
        })
        .map(|(i, _)| i)
        .collect()
}
