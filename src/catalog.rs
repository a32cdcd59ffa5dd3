// src/catalog.rs
//! # Archive Catalog
//! The month index of the archive: which `YYYY-MM` partitions exist, how
//! many articles each holds, and when the index was produced.
//!
//! `CatalogStore` loads the index once per session and hands out clones;
//! `reload` forces a refresh.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{BrowseError, MonthKeyError, Result};
use crate::fetch::ArchiveFetcher;

/// A validated `YYYY-MM` month partition key.
///
/// Ordering is derived from the string form, which is chronological for
/// this shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"2024"` part of `"2024-03"`.
    pub fn year(&self) -> &str {
        &self.0[..4]
    }

    /// `"03"` part of `"2024-03"`.
    pub fn month(&self) -> &str {
        &self.0[5..7]
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..7].iter().all(u8::is_ascii_digit);
        if !shape_ok {
            return Err(MonthKeyError(s.to_string()));
        }
        let month: u8 = s[5..7].parse().map_err(|_| MonthKeyError(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError(s.to_string()));
        }
        Ok(MonthKey(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> String {
        key.0
    }
}

/// The archive index document (`data/index.json`).
///
/// Decoding is lenient: missing or `null` fields default, and entries that
/// are not valid month keys are dropped rather than failing the load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "lenient_months")]
    pub months: Vec<MonthKey>,
    #[serde(default, deserialize_with = "lenient_counts")]
    pub counts: HashMap<MonthKey, u64>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

fn lenient_months<'de, D>(de: D) -> std::result::Result<Vec<MonthKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(de)?.unwrap_or_default();
    Ok(raw.into_iter().filter_map(|s| s.parse().ok()).collect())
}

fn lenient_counts<'de, D>(de: D) -> std::result::Result<HashMap<MonthKey, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, u64>>::deserialize(de)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| k.parse().ok().map(|k| (k, v)))
        .collect())
}

impl Catalog {
    /// Sort months ascending, drop duplicates, and prune counts for months
    /// that are not listed.
    pub fn normalize(&mut self) {
        self.months.sort();
        self.months.dedup();
        let months = &self.months;
        self.counts.retain(|k, _| months.contains(k));
    }

    /// Most recent listed month, if any. Assumes `normalize` has run.
    pub fn latest_month(&self) -> Option<&MonthKey> {
        self.months.last()
    }

    pub fn count_for(&self, key: &MonthKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Display label for a month picker entry, e.g. `"2024-03 (41)"`.
    pub fn label(&self, key: &MonthKey) -> String {
        format!("{key} ({})", self.count_for(key))
    }

    /// Parse `generated_at` as a UTC timestamp. Accepts RFC 3339 and the
    /// zone-less `YYYY-MM-DDTHH:MM:SS[.f]` form some producers emit.
    pub fn generated_at_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.generated_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Loads the catalog once and memoizes it for the life of the session.
pub struct CatalogStore {
    fetcher: Arc<dyn ArchiveFetcher>,
    loaded: RwLock<Option<Catalog>>,
}

impl CatalogStore {
    pub fn new(fetcher: Arc<dyn ArchiveFetcher>) -> Self {
        crate::metrics::ensure_described();
        Self {
            fetcher,
            loaded: RwLock::new(None),
        }
    }

    /// Fetch and memoize the catalog. Later calls return the stored copy
    /// without touching the network.
    pub async fn load(&self) -> Result<Catalog> {
        if let Some(catalog) = self
            .loaded
            .read()
            .expect("catalog lock poisoned")
            .as_ref()
        {
            debug!("catalog served from memory");
            return Ok(catalog.clone());
        }
        self.fetch_and_store().await
    }

    /// Drop the memoized copy and fetch a fresh one.
    pub async fn reload(&self) -> Result<Catalog> {
        self.fetch_and_store().await
    }

    async fn fetch_and_store(&self) -> Result<Catalog> {
        counter!(crate::metrics::CATALOG_LOADS).increment(1);
        let mut catalog = self.fetcher.fetch_catalog().await.map_err(|e| {
            warn!(error = %e, "catalog fetch failed");
            BrowseError::CatalogUnavailable {
                reason: e.to_string(),
            }
        })?;
        catalog.normalize();
        debug!(months = catalog.months.len(), "catalog loaded");
        *self.loaded.write().expect("catalog lock poisoned") = Some(catalog.clone());
        Ok(catalog)
    }
}
