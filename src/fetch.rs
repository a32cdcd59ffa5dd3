// src/fetch.rs
//! Archive transport. `ArchiveFetcher` is the seam between the browsing
//! engine and the static archive: `HttpFetcher` talks to a real export over
//! HTTP, `FixtureFetcher` serves canned documents for tests and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::article::Article;
use crate::catalog::{Catalog, MonthKey};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("newsstand/", env!("CARGO_PKG_VERSION"));

/// Read access to a month-partitioned article archive.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Fetch the month index (`data/index.json`).
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError>;
    /// Fetch one month partition (`data/YYYY/MM.json`).
    async fn fetch_month(&self, key: &MonthKey) -> Result<Vec<Article>, FetchError>;
}

fn month_path(key: &MonthKey) -> String {
    format!("data/{}/{}.json", key.year(), key.month())
}

/// HTTP client for a published archive export.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// `base_url` is the export root; trailing slashes are tolerated.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "archive GET");
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = ?e, %url, "archive http error");
                return Err(e.into());
            }
        };
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ArchiveFetcher for HttpFetcher {
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        self.get_json("data/index.json").await
    }

    async fn fetch_month(&self, key: &MonthKey) -> Result<Vec<Article>, FetchError> {
        self.get_json(&month_path(key)).await
    }
}

/// In-memory archive for tests and the demo binary.
///
/// Months not registered answer with HTTP-shaped 404 errors, and optional
/// per-month latency lets tests interleave slow and fast fetches under
/// `tokio::time`.
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    catalog: Option<Catalog>,
    months: HashMap<MonthKey, Vec<Article>>,
    latency: HashMap<MonthKey, Duration>,
    month_calls: Mutex<HashMap<MonthKey, usize>>,
    catalog_calls: AtomicUsize,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_month(mut self, key: MonthKey, articles: Vec<Article>) -> Self {
        self.months.insert(key, articles);
        self
    }

    /// Delay `fetch_month` for `key` by `latency` before answering.
    pub fn with_month_latency(mut self, key: MonthKey, latency: Duration) -> Self {
        self.latency.insert(key, latency);
        self
    }

    /// How many times `fetch_month` was called for `key`.
    pub fn month_calls(&self, key: &MonthKey) -> usize {
        self.month_calls
            .lock()
            .expect("fixture call log poisoned")
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// How many times `fetch_catalog` was called.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveFetcher for FixtureFetcher {
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        match &self.catalog {
            Some(catalog) => Ok(catalog.clone()),
            None => Err(FetchError::Status(404)),
        }
    }

    async fn fetch_month(&self, key: &MonthKey) -> Result<Vec<Article>, FetchError> {
        *self
            .month_calls
            .lock()
            .expect("fixture call log poisoned")
            .entry(key.clone())
            .or_insert(0) += 1;
        if let Some(latency) = self.latency.get(key) {
            tokio::time::sleep(*latency).await;
        }
        match self.months.get(key) {
            Some(articles) => Ok(articles.clone()),
            None => Err(FetchError::Status(404)),
        }
    }
}
