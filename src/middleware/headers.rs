//! Security response headers.
//!
//! The header set is rendered once from config at startup and shared as an
//! `Extension<Arc<HeaderMap>>`; the middleware copies it onto every
//! response, including error responses.

use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response, Extension};
use http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::config::SecurityHeadersConfig;

/// Build the response header set from config.
pub fn build(config: &SecurityHeadersConfig) -> Arc<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    if let Ok(value) = HeaderValue::from_str(&config.frame_options) {
        headers.insert(header::X_FRAME_OPTIONS, value);
    }

    if let Ok(value) = HeaderValue::from_str(&config.content_security_policy) {
        headers.insert(header::CONTENT_SECURITY_POLICY, value);
    }

    if let Ok(value) = HeaderValue::from_str(&config.referrer_policy) {
        headers.insert(header::REFERRER_POLICY, value);
    }

    headers.insert(
        HeaderName::from_static("x-xss-protection"),
        HeaderValue::from_static("0"),
    );

    if config.hsts_enabled {
        let mut hsts = format!("max-age={}", config.hsts_max_age);
        if config.hsts_include_subdomains {
            hsts.push_str("; includeSubDomains");
        }
        if let Ok(value) = HeaderValue::from_str(&hsts) {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
        }
    }

    Arc::new(headers)
}

/// Copy the prebuilt header set onto the response.
pub async fn apply(
    Extension(headers): Extension<Arc<HeaderMap>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    for (name, value) in headers.iter() {
        response.headers_mut().insert(name.clone(), value.clone());
    }

    response
}
