//! Deal Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    deals::{active::DealsResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Deal Index Handler
///
/// Every deal regardless of status or window.
#[endpoint(
    tags("admin"),
    summary = "List Deals",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DealsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let deals = state
        .app
        .deals
        .list_deals()
        .await
        .map_err(into_status_error)?;

    Ok(Json(DealsResponse {
        deals: deals.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::deals::models::DealUuid;

    use crate::{
        deals::tests::make_deal,
        test_helpers::{Mocks, admin_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_lists_deals_without_remaining_time() -> TestResult {
        let deal = make_deal(DealUuid::new(), Timestamp::now())?;
        let mut mocks = Mocks::default();

        mocks
            .deals
            .expect_list_deals()
            .once()
            .return_once(move || Ok(vec![deal]));

        let service = admin_service(mocks, Router::with_path("admin/deals").get(handler));

        let response: DealsResponse = TestClient::get("http://example.com/admin/deals")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.deals.len(), 1);
        assert_eq!(response.deals[0].remaining, None);

        Ok(())
    }
}
