use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "POST, OPTIONS, GET, PUT, DELETE, PATCH";
const ALLOW_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, \
     Authorization, accept, origin, Cache-Control, X-Requested-With, X-Request-ID";
const MAX_AGE: &str = "86400";

/// Origin allow list. A literal `*` entry allows any origin without
/// credentials; an exact match echoes the origin and allows credentials.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new(origins: Vec<String>) -> Self {
        Self {
            origins: origins.into(),
        }
    }
}

/// Hand-rolled CORS stage. Unlike the usual tower-http layer this one
/// rejects cross-origin requests from unknown origins outright with 403
/// and answers preflights itself with 204.
pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let mut cors_headers = HeaderMap::new();
    match origin.as_deref() {
        // Same-origin and non-browser clients are always allowed.
        None => {
            cors_headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
        Some(origin) => {
            let mut allowed = false;
            for candidate in policy.origins.iter() {
                if candidate == "*" {
                    cors_headers.insert(
                        header::ACCESS_CONTROL_ALLOW_ORIGIN,
                        HeaderValue::from_static("*"),
                    );
                    allowed = true;
                    break;
                }
                if candidate == origin {
                    if let Ok(value) = HeaderValue::from_str(origin) {
                        cors_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                    }
                    cors_headers.insert(
                        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                        HeaderValue::from_static("true"),
                    );
                    allowed = true;
                    break;
                }
            }
            if !allowed && !policy.origins.is_empty() {
                tracing::warn!(origin = %origin, "Rejected cross-origin request");
                return StatusCode::FORBIDDEN.into_response();
            }
        }
    }

    cors_headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    cors_headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    cors_headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE),
    );

    // Preflights stop here; no handler or later stage ever sees them.
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        response.headers_mut().extend(cors_headers);
        return response;
    }

    let mut response = next.run(request).await;
    response.headers_mut().extend(cors_headers);
    response
}
