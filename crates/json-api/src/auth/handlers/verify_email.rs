//! Verify Email Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{ProfileResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Verify Email Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyEmailRequest {
    pub email: String,

    /// Code delivered after signup
    pub code: String,
}

/// Verify Email Handler
#[endpoint(
    tags("auth"),
    summary = "Verify Email",
    responses(
        (status_code = StatusCode::OK, description = "Email verified"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid or expired code"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyEmailRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let profile = state
        .app
        .auth
        .verify_email(&request.email, &request.code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::auth::{AuthServiceError, Profile};

    use crate::test_helpers::{Mocks, public_service};

    use super::{super::tests::make_profile, *};

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("auth/verify-email").post(handler))
    }

    #[tokio::test]
    async fn test_valid_code_marks_profile_verified() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_verify_email()
            .once()
            .withf(|email, code| email == "ada@example.com" && code == "482913")
            .return_once(|email, _| {
                Ok(Profile {
                    email_verified_at: Some(Timestamp::UNIX_EPOCH),
                    ..make_profile(email)
                })
            });

        let profile: ProfileResponse = TestClient::post("http://example.com/auth/verify-email")
            .json(&json!({ "email": "ada@example.com", "code": "482913" }))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert!(profile.email_verified_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_code_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_verify_email()
            .once()
            .return_once(|_, _| Err(AuthServiceError::InvalidVerificationCode));

        let res = TestClient::post("http://example.com/auth/verify-email")
            .json(&json!({ "email": "ada@example.com", "code": "000000" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
