// src/reader.rs
//! The focused-reading cursor.
//!
//! The cursor addresses the full filtered list, not the visible page, so
//! paging forward and back never moves or closes it. Out-of-range requests
//! are silent no-ops and the cursor never wraps around either end.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderCursor {
    index: Option<usize>,
}

impl ReaderCursor {
    /// Open the reader at `index` of a `len`-item list. Returns whether the
    /// cursor moved; an out-of-range index leaves it untouched.
    pub fn open(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.index = Some(index);
            true
        } else {
            false
        }
    }

    /// Step the open cursor by `delta` (negative steps go backwards).
    /// Returns `false` without moving when the reader is closed or the
    /// target falls outside `0..len`.
    pub fn advance(&mut self, delta: i64, len: usize) -> bool {
        let Some(current) = self.index else {
            return false;
        };
        let target = match (current as i64).checked_add(delta) {
            Some(t) if (0..len as i64).contains(&t) => t as usize,
            _ => return false,
        };
        self.index = Some(target);
        true
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }
}
