//! HTTP metrics
//!
//! `/metrics` serves the process registry in Prometheus text format. It is
//! not authenticated; expose it only on a trusted network.
//! [`track_http_metrics`] counts and times every routed request.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, TextEncoder};

use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL, REGISTRY};

/// Label used when a request matched no route
const UNMATCHED_ENDPOINT: &str = "unmatched";

async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_text) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, encoder.format_type())],
            metrics_text,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

/// Record request count and latency, labelled by route template
///
/// Uses the matched route (`/api/v1/posts/:id`) rather than the raw path so
/// label cardinality stays bounded.
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_owned());

    let timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method.as_str(), endpoint.as_str()])
        .start_timer();
    let response = next.run(request).await;
    timer.observe_duration();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[
            method.as_str(),
            endpoint.as_str(),
            response.status().as_str(),
        ])
        .inc();

    response
}

/// Create the `/metrics` router
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(metrics_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn requests_are_counted_by_route_template() {
        let app: Router = Router::new()
            .route("/items/:id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(track_http_metrics));
        let labels = ["GET", "/items/:id", "200"];
        let before = HTTP_REQUESTS_TOTAL.with_label_values(&labels).get();

        for id in ["1", "2"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(format!("/items/{}", id))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(HTTP_REQUESTS_TOTAL.with_label_values(&labels).get(), before + 2);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text_format() {
        let app: Router = metrics_router();

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("text/plain"))
        );
    }
}
