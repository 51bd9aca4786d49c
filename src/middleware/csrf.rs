//! Session-backed CSRF guard.
//!
//! State-changing requests must carry the session's synchronizer token in a
//! `_csrf` form field. Paths on the configured exclusion list skip
//! validation (the OIDC callback is driven by the provider and cannot carry
//! our token). Every request leaves the guard with an [`IssuedCsrfToken`]
//! extension so views can embed the token in forms.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{header, Method};
use tower_sessions::Session;

use crate::{
    error::{csrf::CsrfError, Error},
    model::{app::AppState, session::csrf::SessionCsrfToken},
};

/// Form field carrying the token.
pub const CSRF_FIELD: &str = "_csrf";

/// Cap on how much of a request body the guard will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Token for the current request, attached as a request extension.
#[derive(Clone, Debug)]
pub struct IssuedCsrfToken(pub String);

/// Validate state-changing requests and issue the session token.
pub async fn guard(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    // Exclusion matches the lowercased request path verbatim; excluded
    // entries are lowercased at config load.
    let path = request.uri().path().to_lowercase();
    let excluded = state.config.oidc.excluded_paths.contains(&path);
    let safe = matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );

    let mut request = if excluded || safe {
        request
    } else {
        validate(&session, request).await?
    };

    let token = SessionCsrfToken::get_or_issue(&session).await?;
    request.extensions_mut().insert(IssuedCsrfToken(token));

    Ok(next.run(request).await)
}

/// Check the submitted token against the session, returning the request
/// with its body restored for downstream extractors.
async fn validate(session: &Session, request: Request) -> Result<Request, Error> {
    let stored = SessionCsrfToken::get(session)
        .await?
        .ok_or(CsrfError::TokenMissing)?;

    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| CsrfError::BodyRead)?;

    let submitted = if is_form {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(&bytes)
            .unwrap_or_default()
            .into_iter()
            .find(|(name, _)| name == CSRF_FIELD)
            .map(|(_, value)| value)
    } else {
        None
    };

    match submitted {
        None => Err(CsrfError::TokenMissing.into()),
        Some(token) if token != stored => Err(CsrfError::TokenMismatch.into()),
        Some(_) => Ok(Request::from_parts(parts, Body::from(bytes))),
    }
}
