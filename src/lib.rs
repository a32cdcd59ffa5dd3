// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod article;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod metrics;
pub mod pagination;
pub mod reader;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::article::{reading_content, Article, ReadingContent};
pub use crate::cache::MonthCache;
pub use crate::catalog::{Catalog, CatalogStore, MonthKey};
pub use crate::config::BrowseConfig;
pub use crate::error::{BrowseError, FetchError, Result};
pub use crate::fetch::{ArchiveFetcher, FixtureFetcher, HttpFetcher};
pub use crate::session::{BrowseSession, BrowseView, MonthOption};
