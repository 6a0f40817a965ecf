//! Review Models

use jiff::Timestamp;
use storefront_core::pagination::Pagination;

use crate::{auth::UserUuid, domain::catalog::models::ProductUuid, uuids::TypedUuid};

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Review Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub product_uuid: ProductUuid,
    pub user_uuid: UserUuid,
    pub reviewer_name: String,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Review Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
}

/// One page of reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub pagination: Pagination,
}
