use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::security::apply_security_headers;
use crate::response::ErrorBody;

/// Turns a handler panic into the standard 500 envelope. Responses built
/// here bypass the normal chain, so the hardening headers are applied
/// directly.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "Recovered from handler panic");

    let body = Json(ErrorBody {
        error: "Internal Server Error".to_string(),
        message: "An unexpected error occurred".to_string(),
        details: None,
    });
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    apply_security_headers(response.headers_mut());
    response
}
