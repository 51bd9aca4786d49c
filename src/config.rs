//! Application configuration.
//!
//! All settings are read once at startup from environment variables (a
//! `.env` file is honoured in development) and shared read-only across every
//! request via `Arc<Config>`. Secrets are excluded from serialization so the
//! config snapshot can be exposed to templates without leaking credentials.

use std::str::FromStr;

use serde::Serialize;

use crate::error::config::ConfigError;

/// Top-level application configuration, grouped by concern.
#[derive(Clone, Debug, Serialize)]
pub struct Config {
    /// Server binding and environment settings.
    pub app: AppConfig,
    /// Session cookie and lifetime settings.
    pub session: SessionConfig,
    /// OpenID Connect provider and client settings.
    pub oidc: OidcConfig,
    /// Per-client request throttling settings.
    pub rate_limit: RateLimitConfig,
    /// Security response header settings.
    pub headers: SecurityHeadersConfig,
}

/// Server binding and environment settings.
#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    /// Interface the server binds to.
    pub host: String,
    /// Port the server listens on.
    pub port: u16,
    /// Deployment environment, selects log format and live reload.
    pub environment: Environment,
    /// Whether the app is served over HTTPS; drives the session cookie's
    /// `Secure` attribute.
    pub use_https: bool,
}

/// Deployment environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: readable logs, live reload enabled.
    Development,
    /// Production: structured JSON logs.
    Production,
}

impl Environment {
    /// Returns true when running in production.
    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    /// Returns true when running in development.
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

/// Session cookie and lifetime settings.
#[derive(Clone, Debug, Serialize)]
pub struct SessionConfig {
    /// Session cookie name.
    pub name: String,
    /// Inactivity timeout in seconds; the session layer renews the deadline
    /// on every request.
    pub rolling_secs: i64,
    /// Hard cap in seconds; a session older than this is flushed regardless
    /// of activity.
    pub absolute_secs: i64,
}

/// OpenID Connect provider and client settings.
#[derive(Clone, Debug, Serialize)]
pub struct OidcConfig {
    /// Issuer base URL; provider metadata is discovered beneath it.
    pub issuer_url: String,
    /// OAuth2 client identifier registered with the provider.
    pub client_id: String,
    /// OAuth2 client secret. Never serialized.
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Public base URL of this application, used to build the redirect URI.
    pub base_url: String,
    /// Path the provider redirects back to after login.
    pub callback_path: String,
    /// Scopes requested during the authorization request.
    pub scopes: Vec<String>,
    /// Lowercased request paths exempt from CSRF validation. These are the
    /// routes the provider drives directly and so can never carry the
    /// application's synchronizer token.
    pub excluded_paths: Vec<String>,
    /// Whether logout should also end the session at the provider.
    pub idp_logout: bool,
}

impl OidcConfig {
    /// Full redirect URI registered with the provider.
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.callback_path
        )
    }
}

/// Per-client request throttling settings.
#[derive(Clone, Debug, Serialize)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per client within the window.
    pub max_requests: usize,
    /// Window length in seconds.
    pub window_secs: u64,
}

/// Security response header settings.
#[derive(Clone, Debug, Serialize)]
pub struct SecurityHeadersConfig {
    /// `X-Frame-Options` value.
    pub frame_options: String,
    /// `Content-Security-Policy` value.
    pub content_security_policy: String,
    /// `Referrer-Policy` value.
    pub referrer_policy: String,
    /// Whether to emit `Strict-Transport-Security`. Only sensible with HTTPS.
    pub hsts_enabled: bool,
    /// HSTS `max-age` in seconds.
    pub hsts_max_age: u64,
    /// Whether HSTS covers subdomains.
    pub hsts_include_subdomains: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required: `OIDC_ISSUER_URL`, `OIDC_CLIENT_ID`, `OIDC_CLIENT_SECRET`,
    /// `OIDC_BASE_URL`. Everything else falls back to a sensible default.
    ///
    /// # Returns
    /// - `Ok(Config)` - Complete configuration
    /// - `Err(ConfigError)` - A required variable is missing or a value failed
    ///   to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let use_https = parse_or("APP_USE_HTTPS", false)?;

        Ok(Self {
            app: AppConfig {
                host: var_or("APP_HOST", "0.0.0.0"),
                port: parse_or("APP_PORT", 3000)?,
                environment: parse_or("APP_ENV", Environment::Development)?,
                use_https,
            },
            session: SessionConfig {
                name: var_or("SESSION_NAME", "gatehouse.sid"),
                rolling_secs: parse_or("SESSION_ROLLING_SECS", 3600)?,
                absolute_secs: parse_or("SESSION_ABSOLUTE_SECS", 28800)?,
            },
            oidc: OidcConfig {
                issuer_url: required("OIDC_ISSUER_URL")?,
                client_id: required("OIDC_CLIENT_ID")?,
                client_secret: required("OIDC_CLIENT_SECRET")?,
                base_url: required("OIDC_BASE_URL")?,
                callback_path: var_or("OIDC_CALLBACK_PATH", "/callback"),
                scopes: parse_list(&var_or("OIDC_SCOPES", "openid profile email"), ' '),
                excluded_paths: parse_excluded_paths(&var_or(
                    "OIDC_EXCLUDED_PATHS",
                    "/login,/callback,/logout",
                )),
                idp_logout: parse_or("OIDC_IDP_LOGOUT", false)?,
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 100)?,
                window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 60)?,
            },
            headers: SecurityHeadersConfig {
                frame_options: var_or("HEADERS_FRAME_OPTIONS", "DENY"),
                content_security_policy: var_or(
                    "HEADERS_CSP",
                    "default-src 'self'; script-src 'self'; style-src 'self'",
                ),
                referrer_policy: var_or(
                    "HEADERS_REFERRER_POLICY",
                    "strict-origin-when-cross-origin",
                ),
                hsts_enabled: parse_or("HEADERS_HSTS_ENABLED", use_https)?,
                hsts_max_age: parse_or("HEADERS_HSTS_MAX_AGE", 31_536_000)?,
                hsts_include_subdomains: parse_or("HEADERS_HSTS_INCLUDE_SUBDOMAINS", false)?,
            },
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvValue {
            var: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Split a delimited list, dropping empty entries.
fn parse_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exclusion entries are matched against the lowercased request path, so the
/// list itself is lowercased once at load time. No trailing-slash or query
/// normalization is applied; entries must match the mounted route exactly.
fn parse_excluded_paths(raw: &str) -> Vec<String> {
    parse_list(raw, ',')
        .into_iter()
        .map(|p| p.to_lowercase())
        .collect()
}
