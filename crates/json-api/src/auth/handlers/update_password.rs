//! Update Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::PasswordChange;

use crate::{
    auth::{into_status_error, middleware::bearer_token},
    extensions::*,
    state::State,
};

/// Update Password Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Update Password Handler
///
/// Changes the password and revokes every other session of the user.
#[endpoint(
    tags("auth"),
    summary = "Update Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid field"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdatePasswordRequest>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let token = bearer_token(req).ok_or_else(StatusError::unauthorized)?;
    let request = json.into_inner();

    state
        .app
        .auth
        .update_password(
            token,
            PasswordChange {
                current_password: request.current_password,
                new_password: request.new_password,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::{http::header::AUTHORIZATION, test::TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::auth::{AuthServiceError, ValidationError};

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        public_service(mocks, Router::with_path("auth/update-password").post(handler))
    }

    #[tokio::test]
    async fn test_password_change_returns_204() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_update_password()
            .once()
            .withf(|token, change| {
                token == "sf_v1_token"
                    && change.current_password == "correct horse"
                    && change.new_password == "battery staple"
            })
            .return_once(|_, _| Ok(()));

        let res = TestClient::post("http://example.com/auth/update-password")
            .add_header(AUTHORIZATION, "Bearer sf_v1_token", true)
            .json(&json!({
                "current_password": "correct horse",
                "new_password": "battery staple",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_current_password_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_update_password().once().return_once(|_, _| {
            Err(AuthServiceError::Validation(ValidationError::new(
                "current_password",
                "Current password is incorrect",
            )))
        });

        let res = TestClient::post("http://example.com/auth/update-password")
            .add_header(AUTHORIZATION, "Bearer sf_v1_token", true)
            .json(&json!({
                "current_password": "nope",
                "new_password": "battery staple",
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
