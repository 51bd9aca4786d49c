//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::{
    error::{auth::AuthError, Error},
    model::{app::AppState, session::identity::SessionIdentity},
};

/// Extractor for the authenticated identity.
///
/// Rejects with a 401 when the session carries no identity, so handlers that
/// take this extractor only ever see signed-in users.
pub struct Identity(pub SessionIdentity);

impl FromRequestParts<AppState> for Identity {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, reason)| Error::InternalError(reason.to_string()))?;

        match SessionIdentity::get(&session).await? {
            Some(identity) => Ok(Identity(identity)),
            None => Err(AuthError::NotAuthenticated.into()),
        }
    }
}
