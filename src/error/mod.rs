//! Error types for the Gatehouse server.
//!
//! Domain errors (configuration, authentication, CSRF) each live in their own
//! module and know how to turn themselves into an HTTP response. The
//! top-level [`Error`] aggregates them together with the external library
//! errors that can surface during a request, so handlers can use `?`
//! throughout.

pub mod auth;
pub mod config;
pub mod csrf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    error::{auth::AuthError, config::ConfigError, csrf::CsrfError},
    model::api::ErrorDto,
};

/// Main error type for the Gatehouse server.
///
/// Aggregates domain-specific errors and external library errors into a
/// single type convertible into an HTTP response. `#[from]` conversions keep
/// `?` ergonomic in handlers and services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (login state, callback validation, identity).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// CSRF validation error.
    #[error(transparent)]
    CsrfError(#[from] CsrfError),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Outbound HTTP error (provider discovery, JWKS fetch).
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    /// Template rendering error.
    #[error(transparent)]
    TemplateError(#[from] minijinja::Error),
    /// Malformed URL in provider metadata or configuration.
    #[error(transparent)]
    UrlError(#[from] oauth2::url::ParseError),
    /// Internal error indicating a bug in Gatehouse itself.
    #[error("Internal error in Gatehouse, this indicates a bug: {0:?}")]
    InternalError(String),
}

/// Maps errors to HTTP responses.
///
/// Domain errors carry their own mappings; everything else is treated as an
/// internal server error, logged in full and reported to the client with a
/// generic body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::CsrfError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper turning any displayable error into a 500 response.
///
/// The full error is logged server-side; the client only ever sees a generic
/// message so internal details never leak.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
