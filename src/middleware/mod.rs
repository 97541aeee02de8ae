mod cors;
mod logger;
mod rate_limit;
mod recovery;
mod request_id;
mod security;

pub use cors::{cors_middleware, CorsPolicy};
pub use logger::access_log_middleware;
pub use rate_limit::{rate_limit_middleware, RateLimiter};
pub use recovery::handle_panic;
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
pub use security::{apply_security_headers, security_headers_middleware};
