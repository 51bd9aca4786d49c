//! In-process sliding-window rate limiting.
//!
//! Request timestamps are kept per client key in a shared map; a request is
//! rejected with 429 once the window holds the configured maximum. A
//! background task prunes idle keys so the map does not grow with abandoned
//! clients.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use http::{header, HeaderValue, StatusCode};
use tokio::sync::RwLock;

use crate::model::{api::ErrorDto, app::AppState};

/// Sliding-window request counter shared across workers.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window_secs` seconds.
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            hits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a hit for `key`, returning the retry-after seconds when the
    /// window is already full.
    pub async fn check(&self, key: &str, now: Instant) -> Option<u64> {
        let mut hits = self.hits.write().await;
        let entries = hits.entry(key.to_string()).or_default();

        entries.retain(|hit| now.duration_since(*hit) < self.window);

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(oldest))
                .as_secs()
                .max(1);
            return Some(retry_after);
        }

        entries.push(now);
        None
    }

    /// Periodically drop keys whose hits have all aged out of the window.
    pub async fn run_cleanup(self) {
        let mut interval = tokio::time::interval(self.window.max(Duration::from_secs(60)));

        loop {
            interval.tick().await;

            let now = Instant::now();
            let mut hits = self.hits.write().await;
            hits.retain(|_, entries| {
                entries.retain(|hit| now.duration_since(*hit) < self.window);
                !entries.is_empty()
            });
        }
    }
}

/// Reject requests from clients that exhausted their window.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request);

    if let Some(retry_after) = state.rate_limiter.check(&key, Instant::now()).await {
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorDto {
                error: "Too many requests, please try again later".to_string(),
            }),
        )
            .into_response();

        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        return response;
    }

    next.run(request).await
}

/// Client key for counting: the first `X-Forwarded-For` hop when present,
/// otherwise the peer address.
fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use http::header;
    use tower::ServiceExt;

    use crate::test_support;

    use super::{enforce, RateLimiter};

    #[tokio::test]
    async fn allows_up_to_the_limit_within_the_window() {
        let limiter = RateLimiter::new(3, 60);
        let now = Instant::now();

        assert_eq!(limiter.check("client", now).await, None);
        assert_eq!(limiter.check("client", now).await, None);
        assert_eq!(limiter.check("client", now).await, None);
        assert!(limiter.check("client", now).await.is_some());
    }

    #[tokio::test]
    async fn hits_age_out_of_the_window() {
        let limiter = RateLimiter::new(1, 60);
        let start = Instant::now();

        assert_eq!(limiter.check("client", start).await, None);
        assert!(limiter.check("client", start).await.is_some());

        let later = start + Duration::from_secs(61);
        assert_eq!(limiter.check("client", later).await, None);
    }

    #[tokio::test]
    async fn keys_are_counted_independently() {
        let limiter = RateLimiter::new(1, 60);
        let now = Instant::now();

        assert_eq!(limiter.check("first", now).await, None);
        assert_eq!(limiter.check("second", now).await, None);
        assert!(limiter.check("first", now).await.is_some());
    }

    #[tokio::test]
    async fn rejects_with_429_and_retry_after() {
        let mut state = test_support::test_state();
        state.rate_limiter = RateLimiter::new(1, 60);

        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state.clone(), enforce))
            .with_state(state);

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-forwarded-for", "203.0.113.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-forwarded-for", "203.0.113.9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(header::RETRY_AFTER));
    }
}
