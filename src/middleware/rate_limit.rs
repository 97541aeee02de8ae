use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

struct Visitor {
    window_start: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP. The first request
/// from an IP opens a window; once the window elapses the next request
/// opens a fresh one with a reset count.
pub struct RateLimiter {
    visitors: Mutex<HashMap<IpAddr, Visitor>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            visitors: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    pub fn allow(&self, ip: IpAddr) -> bool {
        let mut visitors = self.visitors.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();

        match visitors.get_mut(&ip) {
            None => {
                visitors.insert(
                    ip,
                    Visitor {
                        window_start: now,
                        count: 1,
                    },
                );
                true
            }
            Some(visitor) => {
                if now.duration_since(visitor.window_start) > self.window {
                    visitor.window_start = now;
                    visitor.count = 1;
                    true
                } else if visitor.count >= self.limit {
                    false
                } else {
                    visitor.count += 1;
                    true
                }
            }
        }
    }

    /// Drops visitors whose window has fully elapsed, bounding memory on
    /// long-running processes with churning client IPs.
    pub fn sweep(&self) {
        let mut visitors = self.visitors.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        visitors.retain(|_, visitor| now.duration_since(visitor.window_start) <= self.window);
    }

    pub fn start_sweeper(self: &Arc<Self>, every: Duration) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; skip it so sweeps
            // start one interval from now.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.sweep();
            }
        });
    }

    #[cfg(test)]
    fn visitor_count(&self) -> usize {
        self.visitors.lock().expect("rate limiter mutex poisoned").len()
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if limiter.allow(addr.ip()) {
        next.run(request).await
    } else {
        tracing::warn!(client_ip = %addr.ip(), "Rate limit exceeded");
        let body = Json(json!({
            "error": "Rate Limit Exceeded",
            "message": "Too many requests. Please try again later."
        }));
        (StatusCode::TOO_MANY_REQUESTS, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
    }

    #[test]
    fn counts_clients_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
        assert!(limiter.allow(ip(2)));
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let limiter = RateLimiter::new(2, Duration::from_millis(40));

        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.allow(ip(1)));
        assert!(limiter.allow(ip(1)));
        assert!(!limiter.allow(ip(1)));
    }

    #[test]
    fn rejections_do_not_extend_the_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.allow(ip(1)));
        // Hammering during the window must not push the reset point out.
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(20));
            assert!(!limiter.allow(ip(1)));
        }
        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.allow(ip(1)));
    }

    #[test]
    fn sweep_evicts_only_expired_visitors() {
        let limiter = RateLimiter::new(5, Duration::from_millis(40));

        limiter.allow(ip(1));
        std::thread::sleep(Duration::from_millis(60));
        limiter.allow(ip(2));

        assert_eq!(limiter.visitor_count(), 2);
        limiter.sweep();
        assert_eq!(limiter.visitor_count(), 1);
    }
}
