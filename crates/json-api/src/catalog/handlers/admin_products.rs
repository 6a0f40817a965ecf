//! Admin Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use storefront_app::domain::catalog::models::ProductQuery;

use crate::{
    catalog::{
        into_status_error,
        list_products::{ProductsResponse, product_sort},
    },
    extensions::*,
    pagination::page_request,
    state::State,
};

/// Admin Product Index Handler
///
/// Same filters as the public listing, including inactive products.
#[endpoint(
    tags("admin"),
    summary = "List All Products",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "One page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid query parameter"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = ProductQuery {
        page: page_request(page, per_page),
        category: category.into_inner(),
        search: search.into_inner(),
        sort: product_sort(sort)?,
        include_inactive: true,
        ..ProductQuery::default()
    };

    let page = state
        .app
        .catalog
        .list_products(query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: page.products.into_iter().map(Into::into).collect(),
        pagination: page.pagination.into(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::catalog::models::{ProductPage, ProductUuid};

    use crate::test_helpers::{Mocks, admin_service, make_product};

    use super::*;

    #[tokio::test]
    async fn test_includes_inactive_products() -> TestResult {
        let uuid = ProductUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_products()
            .once()
            .withf(|query| query.include_inactive)
            .return_once(move |query| {
                let mut product = make_product(uuid, "Retired Mug", 1_200, 0);
                product.is_active = false;

                Ok(ProductPage {
                    products: vec![product],
                    pagination: query.page.paginate(1),
                })
            });

        let service = admin_service(mocks, Router::with_path("admin/products").get(handler));

        let response: ProductsResponse = TestClient::get("http://example.com/admin/products")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.products.len(), 1);
        assert!(!response.products[0].is_active);

        Ok(())
    }
}
