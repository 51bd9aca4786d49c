//! Absolute session lifetime enforcement.
//!
//! The session layer's inactivity expiry keeps sessions alive as long as
//! they are used; this middleware adds the hard cap. Sessions older than
//! the configured absolute lifetime are flushed regardless of activity, and
//! the request continues with a fresh, anonymous session.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    error::Error,
    model::{
        app::AppState,
        session::lifetime::{lifetime_exceeded, SessionStartedAt},
    },
};

/// Flush sessions that have outlived the absolute cap, stamping new
/// sessions with their start time.
pub async fn enforce(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let now = Utc::now().timestamp();
    let cap = state.config.session.absolute_secs;

    match SessionStartedAt::get(&session).await? {
        Some(started) if lifetime_exceeded(started, now, cap) => {
            session.flush().await?;
            SessionStartedAt::insert(&session, now).await?;
        }
        Some(_) => {}
        None => SessionStartedAt::insert(&session, now).await?,
    }

    Ok(next.run(request).await)
}
