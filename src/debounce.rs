// src/debounce.rs
//! Trailing-edge debounce for the search box.
//!
//! Every keystroke calls `settle`; only the call still newest after the
//! quiet period reports `true` and commits its query. A zero delay makes
//! `settle` resolve immediately, which keeps tests and the demo synchronous.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    seq: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register one keystroke and wait out the quiet period. `true` means
    /// this keystroke is still the latest and the caller should commit.
    pub async fn settle(&self) -> bool {
        let my_mark = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.seq.load(Ordering::SeqCst) == my_mark
    }
}
