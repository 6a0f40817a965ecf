//! Delete Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{catalog::into_status_error, extensions::*, state::State};

/// Delete Category Handler
///
/// Products in the category are kept and lose their category.
#[endpoint(
    tags("admin"),
    summary = "Delete Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Category deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn handler(id: PathParam<Uuid>, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .catalog
        .delete_category(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::catalog::models::CategoryUuid;

    use crate::test_helpers::{Mocks, admin_service};

    use super::*;

    #[tokio::test]
    async fn test_deletes_category() -> TestResult {
        let uuid = CategoryUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_delete_category()
            .once()
            .withf(move |category| *category == uuid)
            .return_once(|_| Ok(()));

        let service =
            admin_service(mocks, Router::with_path("admin/categories/{id}").delete(handler));

        let res = TestClient::delete(format!("http://example.com/admin/categories/{uuid}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }
}
