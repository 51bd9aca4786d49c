//! End-to-end tests against the assembled router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use gatehouse::{config::Config, router, startup, test_support};
use tower::ServiceExt;

fn app() -> Router {
    app_with(test_support::test_config())
}

fn app_with(config: Config) -> Router {
    let session_layer = startup::session_layer(&config);
    let state = test_support::test_state_with(config);
    router::build_router(state, session_layer)
}

fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn extract_csrf(html: &str) -> String {
    let marker = r#"name="_csrf" value=""#;
    let start = html.find(marker).expect("csrf field in form") + marker.len();
    let end = html[start..].find('"').expect("csrf value end") + start;
    html[start..end].to_string()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn home_page_renders_with_security_headers() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(response.headers().contains_key(header::REFERRER_POLICY));
}

#[tokio::test]
async fn not_found_responses_still_carry_security_headers() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/no-such-page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn session_cookie_is_http_only_and_lax() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("gatehouse.sid="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    // Rolling expiry from config.
    assert!(cookie.contains("Max-Age=3600"));
    // Not served over HTTPS, so the cookie must not be Secure.
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn session_cookie_is_secure_when_served_over_https() {
    let mut config = test_support::test_config();
    config.app.use_https = true;

    let response = app_with(config)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn feedback_round_trip_with_the_rendered_csrf_token() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let token = extract_csrf(&body_string(response).await);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("_csrf={token}&message=love+the+portal")))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Thanks, your feedback was received."));
}

#[tokio::test]
async fn feedback_without_a_csrf_token_is_rejected() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/feedback")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("message=no+token"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn auth_routes_are_exempt_from_the_csrf_guard() {
    // POST /callback carries no token; the guard lets it through to routing,
    // which rejects the method rather than the missing token.
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/callback")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn responses_are_gzip_compressed_by_default() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
}

#[tokio::test]
async fn the_no_compression_header_disables_compression() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ACCEPT_ENCODING, "gzip")
                .header("x-no-compression", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
}

#[tokio::test]
async fn profile_requires_authentication() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_string(response).await;
    assert!(body.contains("Authentication required"));
}

#[tokio::test]
async fn login_redirects_to_the_provider() {
    let response = app()
        .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("http://auth.example.test/authorize"));
    assert!(location.contains("code_challenge_method=S256"));
}

#[tokio::test]
async fn requests_over_the_rate_limit_get_429() {
    let mut config = test_support::test_config();
    config.rate_limit.max_requests = 2;
    let app = app_with(config);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn openapi_document_lists_the_auth_routes() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("/login"));
    assert!(body.contains("/profile"));
}
