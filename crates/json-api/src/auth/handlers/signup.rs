//! Signup Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::Signup;

use crate::{
    auth::{SessionResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Signup Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl From<SignupRequest> for Signup {
    fn from(request: SignupRequest) -> Self {
        Signup {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
        }
    }
}

/// Signup Handler
///
/// Creates a customer account, sends an email verification code and opens a session.
#[endpoint(
    tags("auth"),
    summary = "Sign Up",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid field"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignupRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let session = state
        .app
        .auth
        .signup(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(session.into()))
}
