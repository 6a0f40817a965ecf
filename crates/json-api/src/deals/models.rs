//! Deal request and response models.

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::deals::models::{Deal, NewDeal};
use storefront_core::deals::{DealDiscount, DealStatus};

use crate::extensions::*;

/// Deal Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub discount_percentage: Option<u8>,
    pub discount_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub min_purchase_amount: Option<u64>,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub product_ids: Vec<Uuid>,
    pub category_ids: Vec<Uuid>,

    /// Coarsest unit of time left, such as `3d` or `5h`; only on the active listing
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remaining: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl DealResponse {
    pub(crate) fn with_remaining(deal: Deal, now: Timestamp) -> Self {
        let remaining = deal.remaining(now).to_string();

        Self {
            remaining: Some(remaining),
            ..deal.into()
        }
    }
}

impl From<Deal> for DealResponse {
    fn from(deal: Deal) -> Self {
        let (discount_percentage, discount_amount, max_discount_amount) = match deal.discount {
            DealDiscount::Percentage {
                percentage,
                max_discount_amount,
            } => (Some(percentage), None, max_discount_amount),
            DealDiscount::FixedAmount { amount } => (None, Some(amount), None),
            DealDiscount::None => (None, None, None),
        };

        Self {
            id: deal.uuid.into_uuid(),
            title: deal.title,
            description: deal.description,
            discount_percentage,
            discount_amount,
            max_discount_amount,
            min_purchase_amount: deal.min_purchase_amount,
            status: deal.window.status.to_string(),
            start_date: deal.window.start.to_string(),
            end_date: deal.window.end.to_string(),
            product_ids: deal.scope.products,
            category_ids: deal.scope.categories,
            remaining: None,
            created_at: deal.created_at.to_string(),
            updated_at: deal.updated_at.to_string(),
        }
    }
}

/// Deal Envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealEnvelope {
    pub deal: DealResponse,
}

impl From<Deal> for DealEnvelope {
    fn from(deal: Deal) -> Self {
        Self { deal: deal.into() }
    }
}

/// Deal Request, used for both create and replace
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealRequest {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Whole percent off; exclusive with `discount_amount`
    #[serde(default)]
    pub discount_percentage: Option<u8>,

    /// Fixed amount off in minor units; exclusive with `discount_percentage`
    #[serde(default)]
    pub discount_amount: Option<u64>,

    #[serde(default)]
    pub max_discount_amount: Option<u64>,

    #[serde(default)]
    pub min_purchase_amount: Option<u64>,

    /// `draft`, `active` or `paused`; defaults to `draft`
    #[serde(default)]
    pub status: Option<String>,

    /// RFC 3339 timestamp
    pub start_date: String,

    /// RFC 3339 timestamp
    pub end_date: String,

    #[serde(default)]
    pub product_ids: Vec<Uuid>,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

impl DealRequest {
    pub(crate) fn into_new_deal(self) -> Result<NewDeal, StatusError> {
        let status = self
            .status
            .map(|status| status.parse::<DealStatus>())
            .transpose()
            .or_400("unknown deal status")?
            .unwrap_or(DealStatus::Draft);

        let start_date = self
            .start_date
            .parse::<Timestamp>()
            .or_400("invalid start_date")?;

        let end_date = self.end_date.parse::<Timestamp>().or_400("invalid end_date")?;

        Ok(NewDeal {
            title: self.title,
            description: self.description,
            discount_percentage: self.discount_percentage,
            discount_amount: self.discount_amount,
            max_discount_amount: self.max_discount_amount,
            min_purchase_amount: self.min_purchase_amount,
            status,
            start_date,
            end_date,
            product_uuids: self.product_ids.into_iter().map(Into::into).collect(),
            category_uuids: self.category_ids.into_iter().map(Into::into).collect(),
        })
    }
}
