//! Delete Deal Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{deals::into_status_error, extensions::*, state::State};

/// Delete Deal Handler
#[endpoint(
    tags("admin"),
    summary = "Delete Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Deal deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
    ),
)]
pub(crate) async fn handler(id: PathParam<Uuid>, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .deals
        .delete_deal(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::deals::models::DealUuid;

    use crate::test_helpers::{Mocks, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_deletes_deal() -> TestResult {
        let uuid = DealUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .deals
            .expect_delete_deal()
            .once()
            .withf(move |deal| *deal == uuid)
            .return_once(|_| Ok(()));

        let service = admin_service(mocks, Router::with_path("admin/deals/{id}").delete(handler));

        let res = TestClient::delete(format!("http://example.com/admin/deals/{uuid}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
