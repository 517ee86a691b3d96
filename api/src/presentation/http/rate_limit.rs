//! Per-client token bucket in front of every API route.
//!
//! Clients are keyed by peer address, then the first `X-Forwarded-For` hop.
//! Liveness endpoints are never limited.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{ConnectInfo, OriginalUri, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use serde_json::json;
use tokio::task::JoinHandle;

use crate::bootstrap::config::Config;

type KeyedLimiter =
    RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock, StateInformationMiddleware>;

const EXEMPT_PATHS: &[&str] = &["/", "/health", "/healthz"];

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
    per_second: u32,
}

impl RateLimit {
    pub fn new(per_second: u32, burst: u32) -> anyhow::Result<Self> {
        let rate = NonZeroU32::new(per_second)
            .ok_or_else(|| anyhow::anyhow!("rate limit must be greater than zero"))?;
        let burst = NonZeroU32::new(burst)
            .ok_or_else(|| anyhow::anyhow!("rate limit burst must be greater than zero"))?;
        let clock = DefaultClock::default();
        let limiter = RateLimiter::dashmap_with_clock(
            Quota::per_second(rate).allow_burst(burst),
            &clock,
        )
        .with_middleware::<StateInformationMiddleware>();
        Ok(Self {
            limiter: Arc::new(limiter),
            clock,
            per_second,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Self::new(cfg.rate_limit_per_second, cfg.rate_limit_burst)
    }

    /// Periodically forgets clients whose bucket has refilled completely.
    pub fn spawn_pruning(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                limiter.retain_recent();
                limiter.shrink_to_fit();
                tracing::debug!(tracked_clients = limiter.len(), "rate_limiter_pruned");
            }
        })
    }
}

fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn set_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32) {
    headers.insert(X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining));
}

pub async fn enforce(State(rl): State<RateLimit>, req: Request, next: Next) -> Response {
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|u| u.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    if EXEMPT_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    let key = client_key(&req);
    match rl.limiter.check_key(&key) {
        Ok(snapshot) => {
            let mut resp = next.run(req).await;
            set_limit_headers(
                resp.headers_mut(),
                rl.per_second,
                snapshot.remaining_burst_capacity(),
            );
            resp
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(rl.clock.now());
            let retry_after = (wait.as_secs_f64().ceil() as u64).max(1);
            tracing::warn!(client = %key, %path, retry_after, "rate_limit_exceeded");
            let body = json!({
                "error": "Rate limit exceeded",
                "message": format!("Too many requests. Limit: {} requests/second", rl.per_second),
            });
            let mut resp = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = resp.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            set_limit_headers(headers, rl.per_second, 0);
            resp
        }
    }
}
