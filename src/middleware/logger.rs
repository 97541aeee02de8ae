use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};

use super::request_id::RequestId;

/// Emits one structured line per request after the response is built.
pub async fn access_log_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let version = request.version();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed();

    tracing::info!(
        method = %method,
        path = %path,
        version = ?version,
        status = response.status().as_u16(),
        latency_ms = latency.as_millis() as u64,
        client_ip = %addr.ip(),
        request_id = %request_id,
        "request completed"
    );

    response
}
