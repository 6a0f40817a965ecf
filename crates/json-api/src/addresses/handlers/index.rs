//! Address Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    addresses::{AddressResponse, into_status_error},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<AddressResponse>,
}

/// Address Index Handler
///
/// Returns the signed-in user's addresses, default first.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AddressesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AddressesResponse {
        addresses: addresses.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::addresses::models::AddressUuid;

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service, make_address};

    use super::*;

    #[tokio::test]
    async fn test_lists_principal_addresses() -> TestResult {
        let default = AddressUuid::new();
        let other = AddressUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .addresses
            .expect_list_addresses()
            .once()
            .withf(|principal| *principal == CUSTOMER)
            .return_once(move |_| Ok(vec![make_address(default, true), make_address(other, false)]));

        let service = customer_service(mocks, Router::with_path("addresses").get(handler));

        let response: AddressesResponse = TestClient::get("http://example.com/addresses")
            .send(&service)
            .await
            .take_json()
            .await?;

        let ids: Vec<_> = response.addresses.iter().map(|address| address.id).collect();

        assert_eq!(ids, [default.into_uuid(), other.into_uuid()]);
        assert!(response.addresses[0].is_default);

        Ok(())
    }
}
