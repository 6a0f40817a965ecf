//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct StorefrontMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounterVec,
    cart_operations_total: IntCounterVec,
}

static METRICS: OnceLock<Option<StorefrontMetrics>> = OnceLock::new();

/// Cart mutations received from clients, labelled on `storefront_cart_operations_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CartOperation {
    Add,
    SetQuantity,
    Remove,
    Clear,
}

impl CartOperation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::SetQuantity => "set_quantity",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a successfully placed order.
pub(crate) fn record_order_placed(payment_method: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .orders_placed_total
            .with_label_values(&[payment_method])
            .inc();
    }
}

/// Count a cart mutation that reached the API.
pub(crate) fn record_cart_operation(operation: CartOperation) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_operations_total
            .with_label_values(&[operation.as_str()])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static StorefrontMetrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn register<C>(registry: &Registry, name: &str, metric: Result<C, prometheus::Error>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<StorefrontMetrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "storefront_http_requests_total",
                "Total HTTP requests partitioned by method, route and status code.",
            ),
            &["method", "route", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration",
        HistogramVec::new(
            HistogramOpts::new(
                "storefront_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "requests_in_flight",
        IntGauge::with_opts(Opts::new(
            "storefront_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
    )?;

    let orders_placed_total = register(
        &registry,
        "orders_placed_total",
        IntCounterVec::new(
            Opts::new(
                "storefront_orders_placed_total",
                "Orders placed, partitioned by payment method.",
            ),
            &["payment_method"],
        ),
    )?;

    let cart_operations_total = register(
        &registry,
        "cart_operations_total",
        IntCounterVec::new(
            Opts::new(
                "storefront_cart_operations_total",
                "Cart mutations received from clients, partitioned by operation.",
            ),
            &["operation"],
        ),
    )?;

    Some(StorefrontMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        cart_operations_total,
    })
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_domain_metrics() {
        observe_request("GET", "/api/products", 200, 0.042);
        record_order_placed("cod");
        record_cart_operation(CartOperation::Add);

        let service =
            Service::new(Router::new().push(Router::with_path("metrics").get(metrics_handler)));

        let response = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await
            .unwrap_or_default();

        for name in [
            "storefront_http_requests_total",
            "storefront_http_request_duration_seconds",
            "storefront_http_requests_in_flight",
            "storefront_orders_placed_total",
            "storefront_cart_operations_total",
        ] {
            assert!(response.contains(name), "expected {name} in metrics response");
        }

        assert!(
            response.contains("operation=\"add\""),
            "cart operations should be labelled"
        );
    }
}
