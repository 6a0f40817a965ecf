//! Create Review Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::reviews::models::NewReview;

use crate::{
    extensions::*,
    reviews::{ReviewResponse, into_status_error},
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    /// 1 to 5
    pub rating: u8,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub comment: Option<String>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(request: CreateReviewRequest) -> Self {
        NewReview {
            rating: request.rating,
            title: request.title,
            comment: request.comment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewCreatedResponse {
    pub review: ReviewResponse,
}

/// Create Review Handler
///
/// Each user may review a product once.
#[endpoint(
    tags("reviews"),
    summary = "Review Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::CONFLICT, description = "Product already reviewed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Rating out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let review = state
        .app
        .reviews
        .create_review(principal, &slug.into_inner(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(ReviewCreatedResponse {
        review: review.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::reviews::{ReviewsServiceError, models::ReviewUuid};

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service};

    use super::{super::tests::make_review, *};

    fn make_service(mocks: Mocks) -> Service {
        customer_service(
            mocks,
            Router::with_path("products/{slug}/reviews").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_review_returns_201() -> TestResult {
        let uuid = ReviewUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .reviews
            .expect_create_review()
            .once()
            .withf(|principal, slug, review| {
                *principal == CUSTOMER
                    && slug == "mug"
                    && *review
                        == NewReview {
                            rating: 4,
                            title: Some("Sturdy".to_string()),
                            comment: None,
                        }
            })
            .return_once(move |_, _, review| Ok(make_review(uuid, review.rating)));

        let mut res = TestClient::post("http://example.com/products/mug/reviews")
            .json(&json!({ "rating": 4, "title": "Sturdy" }))
            .send(&make_service(mocks))
            .await;

        let body: ReviewCreatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.review.id, uuid.into_uuid());
        assert_eq!(body.review.rating, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_second_review_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products/mug/reviews")
            .json(&json!({ "rating": 5 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_rating_out_of_range_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::InvalidRating));

        let res = TestClient::post("http://example.com/products/mug/reviews")
            .json(&json!({ "rating": 6 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
