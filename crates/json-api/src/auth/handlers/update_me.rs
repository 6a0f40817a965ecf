//! Update Current Profile Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::ProfileUpdate;

use crate::{
    auth::{ProfileResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Update Profile Request; absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

/// Update Current Profile Handler
#[endpoint(
    tags("auth"),
    summary = "Update Current Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid field"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let profile = state
        .app
        .auth
        .update_profile(
            principal,
            ProfileUpdate {
                full_name: request.full_name,
                phone: request.phone,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::auth::{AuthServiceError, Profile, ValidationError};

    use crate::test_helpers::{CUSTOMER, Mocks, customer_service};

    use super::{super::tests::make_profile, *};

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("auth/me").put(handler))
    }

    #[tokio::test]
    async fn test_update_forwards_present_fields_only() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_update_profile()
            .once()
            .withf(|principal, update| {
                *principal == CUSTOMER
                    && *update
                        == ProfileUpdate {
                            full_name: None,
                            phone: Some("+44 20 7946 0000".to_string()),
                        }
            })
            .return_once(|_, update| {
                Ok(Profile {
                    phone: update.phone,
                    ..make_profile("ada@example.com")
                })
            });

        let mut res = TestClient::put("http://example.com/auth/me")
            .json(&json!({ "phone": "+44 20 7946 0000" }))
            .send(&make_service(mocks))
            .await;

        let profile: ProfileResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(profile.phone.as_deref(), Some("+44 20 7946 0000"));

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_name_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_update_profile().once().return_once(|_, _| {
            Err(AuthServiceError::Validation(ValidationError::new(
                "full_name",
                "Name is required",
            )))
        });

        let res = TestClient::put("http://example.com/auth/me")
            .json(&json!({ "full_name": "  " }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
