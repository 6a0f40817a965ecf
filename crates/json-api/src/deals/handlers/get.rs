//! Get Deal Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    deals::{DealEnvelope, into_status_error},
    extensions::*,
    state::State,
};

/// Get Deal Handler
#[endpoint(
    tags("admin"),
    summary = "Get Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deal"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DealEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let deal = state
        .app
        .deals
        .get_deal(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(deal.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::deals::{DealsServiceError, models::DealUuid};

    use crate::test_helpers::{Mocks, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_unknown_deal_returns_404() -> TestResult {
        let uuid = DealUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .deals
            .expect_get_deal()
            .once()
            .withf(move |deal| *deal == uuid)
            .return_once(|_| Err(DealsServiceError::NotFound));

        let service = admin_service(mocks, Router::with_path("admin/deals/{id}").get(handler));

        let res = TestClient::get(format!("http://example.com/admin/deals/{uuid}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
