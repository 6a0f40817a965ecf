//! Current Profile Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::{ProfileResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Current Profile Handler
///
/// Returns the signed-in user's profile.
#[endpoint(
    tags("auth"),
    summary = "Get Current Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let profile = state
        .app
        .auth
        .get_profile(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service, public_service};

    use super::{super::tests::make_profile, *};

    #[tokio::test]
    async fn test_me_returns_principal_profile() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_get_profile()
            .once()
            .withf(|principal| *principal == CUSTOMER)
            .return_once(|_| Ok(make_profile("ada@example.com")));

        let service = customer_service(mocks, Router::with_path("auth/me").get(handler));

        let profile: ProfileResponse = TestClient::get("http://example.com/auth/me")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(profile.id, CUSTOMER.user.into_uuid());
        assert_eq!(profile.email, "ada@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_me_without_principal_returns_401() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_get_profile().never();

        let service = public_service(mocks, Router::with_path("auth/me").get(handler));

        let res = TestClient::get("http://example.com/auth/me")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
