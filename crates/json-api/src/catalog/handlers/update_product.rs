//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    catalog::{ProductResponse, UpdateProductRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Update Product Handler
///
/// Absent fields keep their current value.
#[endpoint(
    tags("admin"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Slug already in use"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .update_product(id.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::catalog::{
        CatalogServiceError,
        models::{ProductUpdate, ProductUuid},
    };

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("admin/products/{id}").put(handler))
    }

    #[tokio::test]
    async fn test_updates_only_given_fields() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_product()
            .once()
            .withf(move |product, update| {
                *product == uuid
                    && *update
                        == ProductUpdate {
                            stock: Some(12),
                            is_featured: Some(true),
                            ..ProductUpdate::default()
                        }
            })
            .return_once(move |_, _| {
                let mut product = make_product(uuid, "Mug", 1_200, 12);
                product.is_featured = true;

                Ok(product)
            });

        let product: ProductResponse =
            TestClient::put(format!("http://example.com/admin/products/{uuid}"))
                .json(&json!({ "stock": 12, "is_featured": true }))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(product.stock, 12);
        assert!(product.is_featured);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::InvalidReference));

        let res = TestClient::put(format!("http://example.com/admin/products/{}", ProductUuid::new()))
            .json(&json!({ "category_id": Uuid::now_v7() }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
