//! Authentication error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{error::InternalServerError, model::api::ErrorDto};

/// Errors raised during the OpenID Connect flow or identity lookup.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A protected route was hit without an authenticated identity in the
    /// session.
    #[error("No authenticated identity present in session")]
    NotAuthenticated,
    /// The callback arrived without a pending login state in the session.
    #[error("Login state is not present in session")]
    LoginStateMissing,
    /// The `state` parameter on the callback did not match the value stored
    /// at login time.
    #[error("Failed to login user due to state mismatch during callback")]
    StateMismatch,
    /// The provider rejected or failed the authorization-code exchange.
    #[error("Authorization code exchange failed: {0}")]
    TokenExchange(String),
    /// The ID token failed signature, issuer, audience, or nonce validation.
    #[error("ID token rejected: {0}")]
    IdToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => {
                tracing::debug!("{}", Self::NotAuthenticated);

                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorDto {
                        error: "Authentication required".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::LoginStateMissing | Self::StateMismatch => {
                tracing::debug!("{}", self);

                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorDto {
                        error: "There was an issue logging you in, please try again."
                            .to_string(),
                    }),
                )
                    .into_response()
            }
            err @ (Self::TokenExchange(_) | Self::IdToken(_)) => {
                InternalServerError(err).into_response()
            }
        }
    }
}
