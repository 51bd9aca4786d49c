//! Authentication flow handlers.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    controller::AUTH_TAG,
    error::{auth::AuthError, Error},
    model::{
        app::AppState,
        session::{auth::SessionLoginState, identity::SessionIdentity},
    },
};

/// Query parameters the provider sends to the callback.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackParams {
    /// Anti-forgery state echoed back by the provider.
    pub state: String,
    /// Authorization code to exchange for tokens.
    pub code: String,
}

/// Start the login flow.
///
/// Builds a fresh authorization request, stores its state, nonce, and PKCE
/// verifier in the session, and redirects the user to the provider.
#[utoipa::path(
    get,
    path = "/login",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to the provider's authorization endpoint"),
    )
)]
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect, Error> {
    let request = state.provider.login_request(&state.config.oidc.scopes);

    SessionLoginState::insert(
        &session,
        &SessionLoginState {
            state: request.state,
            nonce: request.nonce,
            pkce_verifier: request.pkce_verifier,
        },
    )
    .await?;

    Ok(Redirect::temporary(&request.url))
}

/// Complete the login flow.
///
/// Consumes the pending login state, verifies the `state` parameter,
/// exchanges the code, validates the ID token against the provider's keys
/// and this flow's nonce, and stores the resulting identity in the session.
#[utoipa::path(
    get,
    path = "/callback",
    tag = AUTH_TAG,
    params(CallbackParams),
    responses(
        (status = 303, description = "Login complete, redirect home"),
        (status = 400, description = "No login in flight or state mismatch", body = crate::model::api::ErrorDto),
    )
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, Error> {
    let login = SessionLoginState::take(&session).await?;

    if params.state != login.state {
        return Err(AuthError::StateMismatch.into());
    }

    let tokens = state
        .provider
        .exchange_code(params.code, login.pkce_verifier)
        .await?;

    let id_token = tokens.id_token.ok_or_else(|| {
        AuthError::IdToken("provider response carried no ID token".to_string())
    })?;
    let claims = state.provider.verify_id_token(&id_token, &login.nonce)?;

    let token_expires_at = tokens
        .expires_in
        .and_then(|lifetime| Duration::from_std(lifetime).ok())
        .map(|lifetime| Utc::now() + lifetime);

    SessionIdentity::insert(
        &session,
        &SessionIdentity {
            claims,
            access_token: Some(tokens.access_token),
            token_expires_at,
        },
    )
    .await?;

    Ok(Redirect::to("/"))
}

/// End the local session, and the provider session when configured.
#[utoipa::path(
    get,
    path = "/logout",
    tag = AUTH_TAG,
    responses(
        (status = 303, description = "Session ended, redirect home or to the provider"),
    )
)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect, Error> {
    session.flush().await?;

    if state.config.oidc.idp_logout {
        if let Some(url) = state.provider.end_session_url(&state.config.oidc.base_url)? {
            return Ok(Redirect::to(&url));
        }
    }

    Ok(Redirect::to("/"))
}
