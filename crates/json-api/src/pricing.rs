//! Pricing Policy Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_core::pricing::PricingPolicy;

use crate::{extensions::*, state::State};

/// Pricing Response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PricingResponse {
    /// Tax rate in basis points, 1000 is 10%
    pub tax_rate_bps: u32,

    /// Subtotals above this amount ship for free
    pub free_shipping_threshold: u64,

    pub flat_shipping_fee: u64,
}

impl From<PricingPolicy> for PricingResponse {
    fn from(policy: PricingPolicy) -> Self {
        Self {
            tax_rate_bps: policy.tax_rate_bps,
            free_shipping_threshold: policy.free_shipping_threshold,
            flat_shipping_fee: policy.flat_shipping_fee,
        }
    }
}

/// Pricing Policy Handler
///
/// Exposes the tax and shipping rules so clients can preview totals with the same
/// arithmetic the server applies at checkout.
#[endpoint(tags("pricing"), summary = "Get Pricing Policy")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PricingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(state.app.pricing.into()))
}
