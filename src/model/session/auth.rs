//! Pending login state stored during an OIDC flow.
//!
//! Written when the user is redirected to the provider and consumed exactly
//! once when the provider redirects back. The `state` value protects the
//! callback against cross-site request forgery, the `nonce` binds the ID
//! token to this flow, and the PKCE verifier completes the code exchange.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{auth::AuthError, Error};

/// Session key for the pending login state.
pub const SESSION_LOGIN_STATE_KEY: &str = "gatehouse.auth.login";

/// Pending login state for an in-flight authorization request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SessionLoginState {
    /// Anti-forgery `state` parameter sent to the provider.
    pub state: String,
    /// Nonce expected back inside the ID token.
    pub nonce: String,
    /// PKCE code verifier for the token exchange.
    pub pkce_verifier: String,
}

impl SessionLoginState {
    /// Store the pending login state in the session.
    pub async fn insert(session: &Session, state: &SessionLoginState) -> Result<(), Error> {
        session.insert(SESSION_LOGIN_STATE_KEY, state).await?;

        Ok(())
    }

    /// Retrieve the pending login state without consuming it.
    pub async fn get(session: &Session) -> Result<Option<SessionLoginState>, Error> {
        Ok(session.get(SESSION_LOGIN_STATE_KEY).await?)
    }

    /// Remove and return the pending login state.
    ///
    /// The state is single-use: consuming it here means a replayed callback
    /// cannot validate a second time.
    ///
    /// # Returns
    /// - `Ok(SessionLoginState)` - State found, removed, and returned
    /// - `Err(Error::AuthError(AuthError::LoginStateMissing))` - No login in
    ///   flight for this session
    pub async fn take(session: &Session) -> Result<SessionLoginState, Error> {
        match session.remove(SESSION_LOGIN_STATE_KEY).await? {
            Some(state) => Ok(state),
            None => Err(AuthError::LoginStateMissing.into()),
        }
    }
}
