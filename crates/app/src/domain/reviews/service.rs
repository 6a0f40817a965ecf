//! Reviews service.

use async_trait::async_trait;
use mockall::automock;
use storefront_core::pagination::PageRequest;

use crate::{
    auth::Principal,
    database::Db,
    domain::reviews::{
        errors::ReviewsServiceError,
        models::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewPage, ReviewUuid},
        repository::PgReviewsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    #[tracing::instrument(name = "reviews.service.list_reviews", skip(self), err)]
    async fn list_reviews(
        &self,
        product_slug: &str,
        page: PageRequest,
    ) -> Result<ReviewPage, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .find_product_by_slug(&mut tx, product_slug)
            .await?;

        let total = self.repository.count_reviews(&mut tx, product).await?;
        let reviews = self.repository.list_reviews(&mut tx, product, page).await?;

        tx.commit().await?;

        Ok(ReviewPage {
            reviews,
            pagination: page.paginate(total),
        })
    }

    #[tracing::instrument(
        name = "reviews.service.create_review",
        skip(self, review),
        fields(user_uuid = %principal.user, rating = review.rating),
        err
    )]
    async fn create_review(
        &self,
        principal: Principal,
        product_slug: &str,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Err(ReviewsServiceError::InvalidRating);
        }

        let review = NewReview {
            title: blank_to_none(review.title),
            comment: blank_to_none(review.comment),
            ..review
        };

        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let product = self
            .repository
            .find_product_by_slug(&mut tx, product_slug)
            .await?;

        let created = self
            .repository
            .create_review(&mut tx, principal.user, product, &review)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "reviews.service.delete_review",
        skip(self),
        fields(user_uuid = %principal.user, review_uuid = %review),
        err
    )]
    async fn delete_review(
        &self,
        principal: Principal,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError> {
        let mut tx = self.db.begin_principal_transaction(principal).await?;

        let rows_affected = self.repository.delete_review(&mut tx, review).await?;

        if rows_affected == 0 {
            return Err(ReviewsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Reviews of an active product, newest first.
    async fn list_reviews(
        &self,
        product_slug: &str,
        page: PageRequest,
    ) -> Result<ReviewPage, ReviewsServiceError>;

    /// Review a product. Each user may review a product once.
    async fn create_review(
        &self,
        principal: Principal,
        product_slug: &str,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError>;

    /// Delete a review. Only its author (or an admin) can see it as deletable.
    async fn delete_review(
        &self,
        principal: Principal,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError>;
}
