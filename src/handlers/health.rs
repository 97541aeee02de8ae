use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;

use crate::constants::API_NAME;
use crate::router::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.repository.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": API_NAME,
                "database": "connected"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": API_NAME,
                    "database": "down",
                    "error": "database ping failed"
                })),
            )
        }
    }
}
