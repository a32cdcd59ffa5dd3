// src/error.rs
//! Error taxonomy for the browsing engine.
//!
//! Only the catalog load can fail a caller: everything under it (missing
//! month files, transport hiccups, superseded fetches) degrades to an empty
//! article list. An absent month is an expected state of an append-only
//! archive.

use thiserror::Error;

/// Result type alias for session-level operations.
pub type Result<T> = std::result::Result<T, BrowseError>;

/// Errors surfaced to consumers of the engine.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The catalog endpoint failed, returned a non-success status, or sent
    /// malformed JSON. Fatal to the initial render; the caller shows a single
    /// "no data generated yet" placeholder and does not retry.
    #[error("catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },
}

/// Transport-level failures. These never cross the cache boundary for month
/// data; the cache downgrades them to an empty month.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A month key that is not of the `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month key '{0}': expected YYYY-MM")]
pub struct MonthKeyError(pub String);
