//! Authenticated identity stored in the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{error::Error, model::auth::UserClaims};

/// Session key for the authenticated identity.
pub const SESSION_IDENTITY_KEY: &str = "gatehouse.auth.identity";

/// Identity of a signed-in user, written by the OIDC callback and discarded
/// with the session.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionIdentity {
    /// Verified ID-token claims.
    pub claims: UserClaims,
    /// Access token returned by the provider, when one was issued.
    pub access_token: Option<String>,
    /// When the access token expires, when the provider said so.
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl SessionIdentity {
    /// Store the identity in the session.
    pub async fn insert(session: &Session, identity: &SessionIdentity) -> Result<(), Error> {
        session.insert(SESSION_IDENTITY_KEY, identity).await?;

        Ok(())
    }

    /// Retrieve the identity, if the session is authenticated.
    pub async fn get(session: &Session) -> Result<Option<SessionIdentity>, Error> {
        Ok(session.get(SESSION_IDENTITY_KEY).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tower_sessions::{MemoryStore, Session};

    use crate::model::auth::UserClaims;

    use super::SessionIdentity;

    fn test_session() -> Session {
        let store = Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }

    fn identity() -> SessionIdentity {
        SessionIdentity {
            claims: UserClaims {
                sub: "user-1".to_string(),
                name: Some("Ada".to_string()),
                email: None,
                nonce: None,
                exp: Utc::now().timestamp() + 900,
                iat: None,
                extra: serde_json::Map::new(),
            },
            access_token: Some("token".to_string()),
            token_expires_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn inserted_identity_is_retrievable() {
        let session = test_session();

        SessionIdentity::insert(&session, &identity()).await.unwrap();

        let stored = SessionIdentity::get(&session).await.unwrap().unwrap();
        assert_eq!(stored.claims.sub, "user-1");
        assert!(stored.access_token.is_some());
    }

    #[tokio::test]
    async fn get_returns_none_for_anonymous_session() {
        let session = test_session();

        let stored = SessionIdentity::get(&session).await.unwrap();

        assert!(stored.is_none());
    }
}
