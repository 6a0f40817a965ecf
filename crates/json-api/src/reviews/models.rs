//! Review response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::reviews::models::Review;

/// Review Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,

    /// Display name of the author
    pub reviewer_name: String,

    /// 1 to 5
    pub rating: u8,

    pub title: Option<String>,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.uuid.into_uuid(),
            product_id: review.product_uuid.into_uuid(),
            user_id: review.user_uuid.into_uuid(),
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            created_at: review.created_at.to_string(),
        }
    }
}
