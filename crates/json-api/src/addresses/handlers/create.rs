//! Create Address Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    addresses::{AddressEnvelope, CreateAddressRequest, into_status_error},
    extensions::*,
    state::State,
};

/// Create Address Handler
///
/// The first address of a user becomes the default.
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing required field"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressEnvelope>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .create_address(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/addresses/{}", address.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::addresses::{AddressesServiceError, models::AddressUuid};

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service, make_address};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("addresses").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "full_name": "Ada Lovelace",
            "address_line1": "12 St James's Square",
            "city": "London",
            "postal_code": "SW1Y 4JH",
            "country": "GB",
        })
    }

    #[tokio::test]
    async fn test_create_address_returns_201_with_location() -> TestResult {
        let uuid = AddressUuid::new();
        let mut mocks = Mocks::default();

        mocks
            .addresses
            .expect_create_address()
            .once()
            .withf(|principal, address| {
                *principal == CUSTOMER && address.city == "London" && !address.is_default
            })
            .return_once(move |_, _| Ok(make_address(uuid, true)));

        let mut res = TestClient::post("http://example.com/addresses")
            .json(&body())
            .send(&make_service(mocks))
            .await;

        let body: AddressEnvelope = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/api/addresses/{uuid}").as_str()));
        assert!(body.address.is_default, "first address becomes the default");

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_field_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .addresses
            .expect_create_address()
            .once()
            .return_once(|_, _| Err(AddressesServiceError::MissingField("city")));

        let res = TestClient::post("http://example.com/addresses")
            .json(&body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_json_field_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.addresses.expect_create_address().never();

        let res = TestClient::post("http://example.com/addresses")
            .json(&json!({ "full_name": "Ada Lovelace" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
