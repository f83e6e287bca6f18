use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Log every response outcome: warn on 4xx, error on 5xx, debug otherwise.
pub async fn log_request_outcome(req: Request<Body>, next: Next) -> Response {
    let uri = req.uri().clone();
    let method = req.method().clone();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_client_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status,
            latency_ms,
            "Client error"
        );
    } else if status.is_server_error() {
        error!(
            method = %method,
            uri = %uri,
            status = %status,
            latency_ms,
            "Server error"
        );
    } else {
        debug!(
            method = %method,
            uri = %uri,
            status = %status,
            latency_ms,
            "Request served"
        );
    }

    response
}
