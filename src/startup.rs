//! Process startup: logging, session layer, and application state.

use std::sync::Arc;

use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::Error,
    middleware::rate_limit::RateLimiter,
    model::app::AppState,
    service::oidc::OidcProvider,
    view,
};

/// Timeout applied to every outbound HTTP request.
pub const OUTBOUND_TIMEOUT_MS: u64 = 5000;

/// Install the global tracing subscriber.
///
/// Production logs as JSON lines; development keeps the human-readable
/// format. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.app.environment.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Build the session layer from config.
///
/// Sessions live in process memory; the cookie is `HttpOnly`, `SameSite=Lax`,
/// and `Secure` when the app is served over HTTPS. The layer handles the
/// rolling inactivity expiry; the absolute cap is enforced by middleware.
pub fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.session.name.clone())
        .with_secure(config.app.use_https)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.session.rolling_secs,
        )))
}

/// Build the shared application state.
///
/// Discovers the OIDC provider (two HTTP round-trips), compiles templates,
/// and spawns the rate limiter's cleanup task.
pub async fn build_state(config: Config) -> Result<AppState, Error> {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(OUTBOUND_TIMEOUT_MS))
        .build()?;

    let provider = OidcProvider::discover(&config.oidc, &http).await?;
    let templates = view::templates()?;

    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
    );
    tokio::spawn(rate_limiter.clone().run_cleanup());

    Ok(AppState {
        config: Arc::new(config),
        provider: Arc::new(provider),
        templates: Arc::new(templates),
        http,
        rate_limiter,
    })
}
