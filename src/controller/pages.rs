//! Server-rendered pages.

use axum::{
    extract::State,
    response::Html,
    Extension, Form,
};
use minijinja::context;
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::Error,
    middleware::locals::Locals,
    model::{app::AppState, session::identity::SessionIdentity},
    view,
};

/// Feedback form body.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    /// Free-form message from the user.
    pub message: String,
}

/// Render the home page.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Extension(locals): Extension<Locals>,
) -> Result<Html<String>, Error> {
    let user = SessionIdentity::get(&session).await?.map(|id| id.claims);

    view::render(
        &state,
        "index.html",
        &locals,
        context! { user => user, submitted => false },
    )
}

/// Accept a feedback submission and re-render the home page.
///
/// The CSRF guard has already validated the form's `_csrf` field by the
/// time this handler runs.
pub async fn submit_feedback(
    State(state): State<AppState>,
    session: Session,
    Extension(locals): Extension<Locals>,
    Form(form): Form<FeedbackForm>,
) -> Result<Html<String>, Error> {
    tracing::info!(length = form.message.len(), "feedback received");

    let user = SessionIdentity::get(&session).await?.map(|id| id.claims);

    view::render(
        &state,
        "index.html",
        &locals,
        context! { user => user, submitted => true },
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, Extension, Form};
    use tower_sessions::{MemoryStore, Session};

    use crate::{middleware::locals::Locals, test_support};

    use super::{index, submit_feedback, FeedbackForm};

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn index_renders_the_signed_out_home_page() {
        let state = test_support::test_state();
        let locals = Locals {
            config: state.config.clone(),
            csrf_token: Some("token-123".to_string()),
        };

        let html = index(State(state), test_session(), Extension(locals))
            .await
            .unwrap()
            .0;

        assert!(html.contains(r#"href="/login""#));
        assert!(html.contains("token-123"));
        assert!(!html.contains("Thanks, your feedback was received."));
    }

    #[tokio::test]
    async fn feedback_submission_shows_the_confirmation() {
        let state = test_support::test_state();
        let locals = Locals {
            config: state.config.clone(),
            csrf_token: Some("token-123".to_string()),
        };

        let html = submit_feedback(
            State(state),
            test_session(),
            Extension(locals),
            Form(FeedbackForm {
                message: "hello".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert!(html.contains("Thanks, your feedback was received."));
    }
}
