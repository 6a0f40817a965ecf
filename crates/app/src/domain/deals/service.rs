//! Deals service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront_core::deals::{DealDiscount, DealWindow};
use tracing::info;

use crate::{
    database::Db,
    domain::deals::{
        errors::DealsServiceError,
        models::{Deal, DealUuid, NewDeal},
        repository::PgDealsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgDealsService {
    db: Db,
    repository: PgDealsRepository,
}

impl PgDealsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDealsRepository::new(),
        }
    }
}

/// Reject definitions the table constraints would refuse, with a precise reason.
fn validate(deal: &NewDeal) -> Result<(), DealsServiceError> {
    if deal.title.trim().is_empty() {
        return Err(DealsServiceError::MissingTitle);
    }

    DealDiscount::validated(
        deal.discount_percentage,
        deal.discount_amount,
        deal.max_discount_amount,
    )?;

    DealWindow::new(deal.status, deal.start_date, deal.end_date)?;

    Ok(())
}

#[async_trait]
impl DealsService for PgDealsService {
    #[tracing::instrument(name = "deals.service.list_active_deals", skip(self), err)]
    async fn list_active_deals(&self, now: Timestamp) -> Result<Vec<Deal>, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let deals = self.repository.list_active_deals(&mut tx, now).await?;

        tx.commit().await?;

        Ok(deals)
    }

    #[tracing::instrument(name = "deals.service.list_deals", skip(self), err)]
    async fn list_deals(&self) -> Result<Vec<Deal>, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let deals = self.repository.list_deals(&mut tx).await?;

        tx.commit().await?;

        Ok(deals)
    }

    #[tracing::instrument(name = "deals.service.get_deal", skip(self), err)]
    async fn get_deal(&self, deal: DealUuid) -> Result<Deal, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_deal(&mut tx, deal).await?;

        tx.commit().await?;

        Ok(found)
    }

    #[tracing::instrument(
        name = "deals.service.create_deal",
        skip(self, deal),
        fields(deal_uuid = tracing::field::Empty),
        err
    )]
    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, DealsServiceError> {
        validate(&deal)?;

        let uuid = DealUuid::new();

        tracing::Span::current().record("deal_uuid", tracing::field::display(uuid));

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_deal(&mut tx, uuid, &deal).await?;

        tx.commit().await?;

        info!(title = %created.title, status = %created.window.status, "created deal");

        Ok(created)
    }

    #[tracing::instrument(name = "deals.service.update_deal", skip(self, deal), err)]
    async fn update_deal(&self, uuid: DealUuid, deal: NewDeal) -> Result<Deal, DealsServiceError> {
        validate(&deal)?;

        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_deal(&mut tx, uuid, &deal).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(name = "deals.service.delete_deal", skip(self), err)]
    async fn delete_deal(&self, deal: DealUuid) -> Result<(), DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_deal(&mut tx, deal).await?;

        if rows_affected == 0 {
            return Err(DealsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait DealsService: Send + Sync {
    /// Deals with `active` status whose window contains `now`, ending soonest first.
    async fn list_active_deals(&self, now: Timestamp) -> Result<Vec<Deal>, DealsServiceError>;

    /// Every deal regardless of status, newest first.
    async fn list_deals(&self) -> Result<Vec<Deal>, DealsServiceError>;

    async fn get_deal(&self, deal: DealUuid) -> Result<Deal, DealsServiceError>;

    /// Create a deal. Exactly one discount kind is required and the window must not be empty.
    async fn create_deal(&self, deal: NewDeal) -> Result<Deal, DealsServiceError>;

    /// Replace a deal's definition.
    async fn update_deal(&self, uuid: DealUuid, deal: NewDeal) -> Result<Deal, DealsServiceError>;

    async fn delete_deal(&self, deal: DealUuid) -> Result<(), DealsServiceError>;
}
