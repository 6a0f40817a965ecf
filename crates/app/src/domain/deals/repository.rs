//! Deals Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront_core::deals::{DealDiscount, DealScope, DealStatus, DealWindow};
use uuid::Uuid;

use crate::{
    database::{amount_param, try_get_optional_amount},
    domain::deals::models::{Deal, DealUuid, NewDeal},
};

const LIST_ACTIVE_DEALS_SQL: &str = include_str!("sql/list_active_deals.sql");
const LIST_DEALS_SQL: &str = include_str!("sql/list_deals.sql");
const GET_DEAL_SQL: &str = include_str!("sql/get_deal.sql");
const CREATE_DEAL_SQL: &str = include_str!("sql/create_deal.sql");
const UPDATE_DEAL_SQL: &str = include_str!("sql/update_deal.sql");
const DELETE_DEAL_SQL: &str = include_str!("sql/delete_deal.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDealsRepository;

impl PgDealsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_active_deals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        query_as::<Postgres, Deal>(LIST_ACTIVE_DEALS_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_deals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        query_as::<Postgres, Deal>(LIST_DEALS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
    ) -> Result<Deal, sqlx::Error> {
        query_as::<Postgres, Deal>(GET_DEAL_SQL)
            .bind(deal.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: DealUuid,
        deal: &NewDeal,
    ) -> Result<Deal, sqlx::Error> {
        bind_definition(
            query_as::<Postgres, Deal>(CREATE_DEAL_SQL).bind(uuid.into_uuid()),
            deal,
        )?
        .fetch_one(&mut **tx)
        .await
    }

    pub(crate) async fn update_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: DealUuid,
        deal: &NewDeal,
    ) -> Result<Deal, sqlx::Error> {
        bind_definition(
            query_as::<Postgres, Deal>(UPDATE_DEAL_SQL).bind(uuid.into_uuid()),
            deal,
        )?
        .fetch_one(&mut **tx)
        .await
    }

    pub(crate) async fn delete_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DEAL_SQL)
            .bind(deal.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

type DealQuery<'q> = sqlx::query::QueryAs<'q, Postgres, Deal, sqlx::postgres::PgArguments>;

/// Bind parameters `$2..=$12` shared by the create and update statements.
fn bind_definition<'q>(
    query: DealQuery<'q>,
    deal: &'q NewDeal,
) -> Result<DealQuery<'q>, sqlx::Error> {
    let optional_amount = |amount: Option<u64>, column: &str| {
        amount
            .map(|amount| amount_param(amount, column))
            .transpose()
    };

    let product_uuids: Vec<Uuid> = deal
        .product_uuids
        .iter()
        .map(|product| product.into_uuid())
        .collect();

    let category_uuids: Vec<Uuid> = deal
        .category_uuids
        .iter()
        .map(|category| category.into_uuid())
        .collect();

    Ok(query
        .bind(deal.title.trim())
        .bind(deal.description.as_deref())
        .bind(deal.discount_percentage.map(i16::from))
        .bind(optional_amount(deal.discount_amount, "discount_amount")?)
        .bind(optional_amount(
            deal.max_discount_amount,
            "max_discount_amount",
        )?)
        .bind(optional_amount(
            deal.min_purchase_amount,
            "min_purchase_amount",
        )?)
        .bind(deal.status.as_str())
        .bind(SqlxTimestamp::from(deal.start_date))
        .bind(SqlxTimestamp::from(deal.end_date))
        .bind(product_uuids)
        .bind(category_uuids))
}

impl<'r> FromRow<'r, PgRow> for Deal {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let percentage = row
            .try_get::<Option<i16>, _>("discount_percentage")?
            .map(|percentage| {
                u8::try_from(percentage).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "discount_percentage".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        let status: String = row.try_get("status")?;

        let status = status
            .parse::<DealStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: DealUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            discount: DealDiscount::from_columns(
                percentage,
                try_get_optional_amount(row, "discount_amount")?,
                try_get_optional_amount(row, "max_discount_amount")?,
            ),
            min_purchase_amount: try_get_optional_amount(row, "min_purchase_amount")?,
            // Stored windows are guaranteed `start < end` by a table constraint.
            window: DealWindow {
                status,
                start: row.try_get::<SqlxTimestamp, _>("start_date")?.to_jiff(),
                end: row.try_get::<SqlxTimestamp, _>("end_date")?.to_jiff(),
            },
            scope: DealScope {
                products: row.try_get("product_uuids")?,
                categories: row.try_get("category_uuids")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
