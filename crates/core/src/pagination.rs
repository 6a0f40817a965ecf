//! Pagination

use serde::{Deserialize, Serialize};

/// Page size used when none is requested.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Build a request from optional query values, clamping out-of-range input.
    ///
    /// Pages start at 1 and page sizes are held to `1..=100`.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// SQL `LIMIT` value.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Describe the page within `total` rows.
    #[must_use]
    pub fn paginate(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages: total.div_ceil(u64::from(self.per_page)),
        }
    }
}

/// Pagination metadata returned alongside a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// One-based page number.
    pub page: u32,

    /// Rows per page.
    pub per_page: u32,

    /// Total matching rows.
    pub total: u64,

    /// `ceil(total / per_page)`.
    pub total_pages: u64,
}
