//! Session start time, used to enforce the absolute lifetime cap.
//!
//! tower-sessions handles the rolling (inactivity) expiry itself; the
//! absolute cap needs the session's creation time, which the store does not
//! expose. The start time is recorded here on first use and checked by the
//! lifetime middleware on every request.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::Error;

/// Session key for the session start time.
pub const SESSION_STARTED_AT_KEY: &str = "gatehouse.session.started_at";

/// Unix timestamp (seconds) of the moment the session was first used.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SessionStartedAt(pub i64);

impl SessionStartedAt {
    /// Record the session start time.
    pub async fn insert(session: &Session, started_at: i64) -> Result<(), Error> {
        session
            .insert(SESSION_STARTED_AT_KEY, SessionStartedAt(started_at))
            .await?;

        Ok(())
    }

    /// Retrieve the session start time, if recorded.
    pub async fn get(session: &Session) -> Result<Option<i64>, Error> {
        Ok(session
            .get::<SessionStartedAt>(SESSION_STARTED_AT_KEY)
            .await?
            .map(|started| started.0))
    }
}

/// Whether a session started at `started_at` has outlived the absolute cap.
pub fn lifetime_exceeded(started_at: i64, now: i64, absolute_secs: i64) -> bool {
    now - started_at >= absolute_secs
}
