//! Route table and middleware stack.

use axum::{
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    controller::{auth, pages, profile, AUTH_TAG, PROFILE_TAG},
    middleware::{compression, csrf, headers, locals, rate_limit, session_lifetime},
    model::app::AppState,
};

#[derive(OpenApi)]
#[openapi(tags(
    (name = AUTH_TAG, description = "OpenID Connect login flow"),
    (name = PROFILE_TAG, description = "Signed-in user endpoints"),
))]
struct ApiDoc;

/// Assemble the application router.
///
/// Middleware runs outermost first: request tracing, security headers,
/// compression (with the opt-out marker inside it), the session layer, the
/// absolute-lifetime check, the CSRF guard, the rate limiter, and the
/// per-request locals.
pub fn build_router(state: AppState, session_layer: SessionManagerLayer<MemoryStore>) -> Router {
    let security_headers = headers::build(&state.config.headers);

    let (api_router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(auth::login))
        .routes(routes!(auth::callback))
        .routes(routes!(auth::logout))
        .routes(routes!(profile::profile))
        .split_for_parts();

    let pages_router = Router::new()
        .route("/", get(pages::index))
        .route("/feedback", post(pages::submit_feedback));

    Router::new()
        .merge(api_router)
        .merge(pages_router)
        .route(
            "/api/openapi.json",
            get(move || std::future::ready(Json(api.clone()))),
        )
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(middleware::from_fn_with_state(state.clone(), locals::attach))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), csrf::guard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_lifetime::enforce,
        ))
        .layer(session_layer)
        .layer(middleware::from_fn(compression::mark_opt_out))
        .layer(compression::layer())
        .layer(middleware::from_fn(headers::apply))
        .layer(Extension(security_headers))
        .layer(
            // Request logging must be visible at the default `info` filter,
            // not only when tower_http is raised to debug.
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::{startup, test_support};

    use super::build_router;

    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl CaptureWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn every_request_is_logged_at_the_default_info_level() {
        let writer = CaptureWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_writer(writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = test_support::test_config();
        let session_layer = startup::session_layer(&config);
        let app = build_router(test_support::test_state_with(config), session_layer);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let logs = writer.contents();
        assert!(logs.contains("finished processing request"));
    }
}
