//! Shared application state.

use std::sync::Arc;

use minijinja::Environment;

use crate::{config::Config, middleware::rate_limit::RateLimiter, service::oidc::OidcProvider};

/// State shared by every handler and middleware.
///
/// All members are cheap to clone: configuration, the discovered OIDC
/// provider, and the template environment sit behind `Arc`s, the outbound
/// HTTP client and rate limiter are internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Read-only configuration, loaded once at startup.
    pub config: Arc<Config>,
    /// OIDC provider client built from discovered metadata.
    pub provider: Arc<OidcProvider>,
    /// Compiled template environment.
    pub templates: Arc<Environment<'static>>,
    /// Outbound HTTP client with the fixed request timeout applied.
    pub http: reqwest::Client,
    /// Per-client request throttle.
    pub rate_limiter: RateLimiter,
}
