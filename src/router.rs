use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

use crate::constants::{
    MAX_REQUEST_BODY_BYTES, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_SWEEP_INTERVAL, RATE_LIMIT_WINDOW,
    REQUEST_TIMEOUT,
};
use crate::handlers::{cars, health};
use crate::middleware::{
    access_log_middleware, cors_middleware, handle_panic, rate_limit_middleware,
    request_id_middleware, security_headers_middleware, CorsPolicy, RateLimiter,
};
use crate::repository::CarRepository;
use crate::service::CarService;

#[derive(Clone)]
pub struct AppState {
    pub service: CarService,
    pub repository: Arc<dyn CarRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self {
            service: CarService::new(repository.clone()),
            repository,
        }
    }
}

/// Assembles the full application: routes plus the middleware chain.
/// Layers are listed outermost first, so a request passes panic
/// recovery, request id, access logging, security headers, CORS, the
/// body cap, rate limiting, and the timeout before reaching a handler.
pub fn build_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    let cors_policy = CorsPolicy::new(allowed_origins);

    let limiter = Arc::new(RateLimiter::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW));
    limiter.start_sweeper(RATE_LIMIT_SWEEP_INTERVAL);

    let middleware = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(access_log_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn_with_state(cors_policy, cors_middleware))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(from_fn_with_state(limiter, rate_limit_middleware))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    Router::new()
        .merge(cars::router())
        .merge(health::router())
        .layer(middleware)
        .with_state(state)
}
