//! Per-request render locals.
//!
//! Handlers that render templates take `Extension<Locals>`; the middleware
//! assembles it from application state and whatever the CSRF guard issued
//! for this request. Views see the full (secret-stripped) config plus the
//! form token.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    config::Config,
    middleware::csrf::IssuedCsrfToken,
    model::app::AppState,
};

/// Values available to every rendered template.
#[derive(Clone, Debug)]
pub struct Locals {
    /// Application config, serialized into the render context.
    pub config: Arc<Config>,
    /// Token for the hidden `_csrf` form field, when the guard issued one.
    pub csrf_token: Option<String>,
}

/// Attach [`Locals`] to the request.
pub async fn attach(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let csrf_token = request
        .extensions()
        .get::<IssuedCsrfToken>()
        .map(|token| token.0.clone());

    request.extensions_mut().insert(Locals {
        config: state.config.clone(),
        csrf_token,
    });

    next.run(request).await
}
