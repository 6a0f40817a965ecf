//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront_core::pagination::PageRequest;
use uuid::Uuid;

use crate::{
    auth::UserUuid,
    database::try_get_total,
    domain::{
        catalog::models::ProductUuid,
        reviews::models::{NewReview, Review, ReviewUuid},
    },
};

const FIND_PRODUCT_BY_SLUG_SQL: &str = include_str!("sql/find_product_by_slug.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const COUNT_REVIEWS_SQL: &str = include_str!("sql/count_reviews.sql");
const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const DELETE_REVIEW_SQL: &str = include_str!("sql/delete_review.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_product_by_slug(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(FIND_PRODUCT_BY_SLUG_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await?;

        Ok(ProductUuid::from_uuid(uuid))
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, sqlx::Error> {
        query_as::<Postgres, Review>(LIST_REVIEWS_SQL)
            .bind(product.into_uuid())
            .bind(page.limit())
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_REVIEWS_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_total(&row, "total")
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        review: &NewReview,
    ) -> Result<Review, sqlx::Error> {
        query_as::<Postgres, Review>(CREATE_REVIEW_SQL)
            .bind(ReviewUuid::new().into_uuid())
            .bind(product.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(review.rating))
            .bind(review.title.as_deref())
            .bind(review.comment.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_REVIEW_SQL)
            .bind(review.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Review {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            reviewer_name: row.try_get("reviewer_name")?,
            rating: u8::try_from(rating).map_err(|e| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(e),
            })?,
            title: row.try_get("title")?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
