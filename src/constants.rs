use std::time::Duration;

pub const API_NAME: &str = "car-api";

/// Hard cap on inbound request bodies.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Deadline for a single request, including store calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Requests allowed per client IP within one rate limit window.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// How often idle rate limit entries are evicted.
pub const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub const DB_MAX_CONNECTIONS: u32 = 10;
