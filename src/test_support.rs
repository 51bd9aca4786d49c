//! Shared fixtures for unit and integration tests.
//!
//! Compiled into the crate's own tests and, behind the `test-utils`
//! feature, into the integration-test build of the crate.

use std::sync::Arc;

use jsonwebtoken::jwk::JwkSet;

use crate::{
    config::{
        AppConfig, Config, Environment, OidcConfig, RateLimitConfig, SecurityHeadersConfig,
        SessionConfig,
    },
    middleware::rate_limit::RateLimiter,
    model::app::AppState,
    service::oidc::{OidcProvider, ProviderMetadata},
    view,
};

/// A complete development-flavoured config pointing at a fake provider.
pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: Environment::Development,
            use_https: false,
        },
        session: SessionConfig {
            name: "gatehouse.sid".to_string(),
            rolling_secs: 3600,
            absolute_secs: 28_800,
        },
        oidc: OidcConfig {
            issuer_url: "http://auth.example.test".to_string(),
            client_id: "portal-client".to_string(),
            client_secret: "portal-secret".to_string(),
            base_url: "http://localhost:3000".to_string(),
            callback_path: "/callback".to_string(),
            scopes: vec!["openid".to_string(), "profile".to_string()],
            excluded_paths: vec![
                "/login".to_string(),
                "/callback".to_string(),
                "/logout".to_string(),
            ],
            idp_logout: false,
        },
        rate_limit: RateLimitConfig {
            max_requests: 100,
            window_secs: 60,
        },
        headers: SecurityHeadersConfig {
            frame_options: "DENY".to_string(),
            content_security_policy: "default-src 'self'".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            hsts_enabled: false,
            hsts_max_age: 31_536_000,
            hsts_include_subdomains: false,
        },
    }
}

/// Provider metadata matching [`test_config`]'s issuer.
pub fn test_metadata(issuer: &str) -> ProviderMetadata {
    ProviderMetadata {
        issuer: issuer.to_string(),
        authorization_endpoint: format!("{issuer}/authorize"),
        token_endpoint: format!("{issuer}/token"),
        jwks_uri: format!("{issuer}/jwks"),
        end_session_endpoint: Some(format!("{issuer}/logout")),
    }
}

/// Application state with the default test config.
pub fn test_state() -> AppState {
    test_state_with(test_config())
}

/// Application state for a caller-supplied config, skipping discovery.
pub fn test_state_with(config: Config) -> AppState {
    let metadata = test_metadata(&config.oidc.issuer_url);
    let provider = OidcProvider::from_parts(metadata, JwkSet { keys: Vec::new() }, &config.oidc)
        .expect("test provider");
    let templates = view::templates().expect("test templates");
    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
    );

    AppState {
        config: Arc::new(config),
        provider: Arc::new(provider),
        templates: Arc::new(templates),
        http: reqwest::Client::new(),
        rate_limiter,
    }
}
