//! Healthcheck Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Healthcheck Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,

    pub service: String,

    /// Crate version of the running binary
    pub version: String,
}

/// Healthcheck Handler
///
/// Liveness probe for load balancers. The database is not consulted, so a failing pool
/// does not take every instance out of rotation at once.
#[endpoint(tags("health"), summary = "Liveness Probe")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_healthcheck_reports_service_and_version() -> TestResult {
        let router = Router::with_path("healthcheck").get(handler);

        let mut res = TestClient::get("http://example.com/healthcheck")
            .send(&Service::new(router))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: HealthResponse = res.take_json().await?;

        assert_eq!(body.status, "ok");
        assert_eq!(body.service, "storefront-json");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));

        Ok(())
    }
}
