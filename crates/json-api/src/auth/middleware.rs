//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use storefront_app::auth::AuthServiceError;

use crate::{extensions::*, state::State};

/// Resolve the bearer token into a principal and store it in the depot.
#[salvo::handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let principal = match state.app.auth.authenticate_bearer(token).await {
        Ok(principal) => principal,
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Invalid or expired session"));
            ctrl.skip_rest();

            return;
        }
        Err(source) => {
            error!("failed to authenticate session: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_principal(principal);

    ctrl.call_next(req, depot, res).await;
}

/// Reject principals without the admin role. Runs after [`authenticate`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.principal_or_401() {
        Ok(principal) if principal.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_) => {
            res.render(StatusError::forbidden().brief("Admin access required"));
            ctrl.skip_rest();
        }
        Err(unauthorized) => {
            res.render(unauthorized);
            ctrl.skip_rest();
        }
    }
}

/// The token of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
