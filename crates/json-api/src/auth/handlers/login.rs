//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::auth::Credentials;

use crate::{
    auth::{SessionResponse, into_status_error},
    extensions::*,
    state::State,
};

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Session opened"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let session = state
        .app
        .auth
        .login(Credentials {
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}
