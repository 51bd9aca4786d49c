//! CSRF synchronizer token stored in the session.
//!
//! The token is issued lazily on the first request that needs one and lives
//! until the session rotates. Forms embed it as a hidden `_csrf` field; the
//! CSRF guard compares the submitted value against this stored one.

use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::Error;

/// Session key for the CSRF synchronizer token.
pub const SESSION_CSRF_KEY: &str = "gatehouse.csrf";

/// Length of a generated token.
const TOKEN_LEN: usize = 32;

/// Session wrapper for the CSRF synchronizer token.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SessionCsrfToken(pub String);

impl SessionCsrfToken {
    /// Retrieve the current token, if one has been issued.
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        Ok(session
            .get::<SessionCsrfToken>(SESSION_CSRF_KEY)
            .await?
            .map(|token| token.0))
    }

    /// Retrieve the current token, issuing a fresh one if the session has
    /// none yet.
    pub async fn get_or_issue(session: &Session) -> Result<String, Error> {
        if let Some(token) = Self::get(session).await? {
            return Ok(token);
        }

        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();

        session
            .insert(SESSION_CSRF_KEY, SessionCsrfToken(token.clone()))
            .await?;

        Ok(token)
    }
}
