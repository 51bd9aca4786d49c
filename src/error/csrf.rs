//! CSRF validation error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Errors raised by the CSRF guard on state-changing requests.
#[derive(Error, Debug)]
pub enum CsrfError {
    /// The request body carried no synchronizer token.
    #[error("Request is missing a CSRF token")]
    TokenMissing,
    /// The supplied token did not match the one stored in the session.
    #[error("Supplied CSRF token does not match the session token")]
    TokenMismatch,
    /// The request body could not be buffered for validation.
    #[error("Failed to read request body for CSRF validation")]
    BodyRead,
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::TokenMissing | Self::TokenMismatch => StatusCode::FORBIDDEN,
            Self::BodyRead => StatusCode::BAD_REQUEST,
        };

        tracing::debug!("{}", self);

        (
            status,
            Json(ErrorDto {
                error: "Invalid or missing CSRF token".to_string(),
            }),
        )
            .into_response()
    }
}
