//! Active Deals Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    deals::{DealResponse, into_status_error},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealsResponse {
    pub deals: Vec<DealResponse>,
}

/// Active Deals Handler
///
/// Deals with `active` status whose window contains the current instant, each with
/// the time left before it ends.
#[endpoint(tags("deals"), summary = "List Active Deals")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DealsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let now = Timestamp::now();

    let deals = state
        .app
        .deals
        .list_active_deals(now)
        .await
        .map_err(into_status_error)?;

    Ok(Json(DealsResponse {
        deals: deals
            .into_iter()
            .map(|deal| DealResponse::with_remaining(deal, now))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::deals::models::DealUuid;

    use crate::{
        deals::tests::make_deal,
        test_helpers::{Mocks, public_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_active_deals_carry_remaining_time() -> TestResult {
        let uuid = DealUuid::new();
        let deal = make_deal(uuid, Timestamp::now())?;
        let mut mocks = Mocks::default();

        mocks
            .deals
            .expect_list_active_deals()
            .once()
            .return_once(move |_| Ok(vec![deal]));

        let service = public_service(mocks, Router::with_path("deals/active").get(handler));

        let response: DealsResponse = TestClient::get("http://example.com/deals/active")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.deals.len(), 1);
        assert_eq!(response.deals[0].id, uuid.into_uuid());
        assert_eq!(response.deals[0].discount_percentage, Some(20));
        assert_eq!(response.deals[0].remaining.as_deref(), Some("2d"));

        Ok(())
    }
}
