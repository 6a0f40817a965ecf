//! Pagination query and response helpers.

use salvo::oapi::{ToSchema, extract::QueryParam};
use serde::{Deserialize, Serialize};
use storefront_core::pagination::{PageRequest, Pagination};

/// Pagination Response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    /// Current page, starting at 1
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Items across all pages
    pub total: u64,

    /// Number of pages
    pub total_pages: u64,
}

impl From<Pagination> for PaginationResponse {
    fn from(pagination: Pagination) -> Self {
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total: pagination.total,
            total_pages: pagination.total_pages,
        }
    }
}

/// Clamp the optional `page` and `per_page` query parameters into a page request.
pub(crate) fn page_request(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
) -> PageRequest {
    PageRequest::new(page.into_inner(), per_page.into_inner())
}
