// src/pagination.rs
//! Page math over the filtered article list.
//!
//! Out-of-range page numbers are never an error: every request is clamped
//! into `[1, total_pages]`, and an empty list still exposes one empty page.

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Resolved paging for one render: the clamped page, the page count, and
/// the half-open `start..end` slice of the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

/// Clamp `requested` and compute the visible slice of a `len`-item list.
///
/// `total_pages = max(1, ceil(len / page_size))`; the slice of the last
/// page is shortened to the remainder.
pub fn paginate(len: usize, requested: i64, page_size: usize) -> PageBounds {
    let size = page_size.max(1);
    let total_pages = len.div_ceil(size).max(1);
    let page = requested.clamp(1, total_pages as i64) as usize;
    let start = ((page - 1) * size).min(len);
    let end = (start + size).min(len);
    PageBounds {
        page,
        total_pages,
        start,
        end,
    }
}

/// The session-held paging state: the current page number and the page
/// size it was configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to page 1. Runs whenever the filtered list is rebuilt.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move to `requested`, clamped against a `len`-item list. Returns the
    /// page actually landed on.
    pub fn set_page(&mut self, requested: i64, len: usize) -> usize {
        self.page = paginate(len, requested, self.page_size).page;
        self.page
    }

    /// Current visible slice of a `len`-item list.
    pub fn bounds(&self, len: usize) -> PageBounds {
        paginate(len, self.page as i64, self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_one_empty_page() {
        let b = paginate(0, 1, 12);
        assert_eq!(b.total_pages, 1);
        assert_eq!(b.page, 1);
        assert_eq!(b.start..b.end, 0..0);
    }

    #[test]
    fn exact_multiple_fills_the_last_page() {
        let b = paginate(24, 2, 12);
        assert_eq!(b.total_pages, 2);
        assert_eq!(b.start..b.end, 12..24);
    }

    #[test]
    fn remainder_shortens_the_last_page() {
        let b = paginate(25, 3, 12);
        assert_eq!(b.total_pages, 3);
        assert_eq!(b.start..b.end, 24..25);
    }

    #[test]
    fn overshoot_clamps_to_the_last_page() {
        let b = paginate(25, 10, 12);
        assert_eq!(b.page, 3);
        assert_eq!(b.start..b.end, 24..25);
    }

    #[test]
    fn zero_and_negative_requests_clamp_to_page_one() {
        assert_eq!(paginate(25, 0, 12).page, 1);
        assert_eq!(paginate(25, -4, 12).page, 1);
    }

    #[test]
    fn degenerate_page_size_is_coerced_to_one() {
        let b = paginate(3, 2, 0);
        assert_eq!(b.total_pages, 3);
        assert_eq!(b.start..b.end, 1..2);
    }

    #[test]
    fn set_page_stores_the_clamped_page() {
        let mut p = Pagination::new(12);
        assert_eq!(p.set_page(99, 25), 3);
        assert_eq!(p.page(), 3);
        p.reset();
        assert_eq!(p.page(), 1);
    }
}
