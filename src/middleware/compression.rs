//! Response compression with a per-request opt-out.
//!
//! Responses are gzip-compressed by default. A request carrying the
//! `x-no-compression` header has its response tagged with a marker
//! extension, and the compression predicate skips tagged responses.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_http::compression::{
    predicate::{DefaultPredicate, Predicate},
    CompressionLayer,
};

/// Request header that disables compression for the response.
pub const NO_COMPRESSION_HEADER: &str = "x-no-compression";

/// Marker extension for responses that must not be compressed.
#[derive(Clone, Copy, Debug)]
pub struct CompressionDisabled;

/// Compression predicate honoring the opt-out marker on top of the default
/// content-type and size heuristics.
#[derive(Clone, Default)]
pub struct SkipMarkedResponses(DefaultPredicate);

impl Predicate for SkipMarkedResponses {
    fn should_compress<B>(&self, response: &http::Response<B>) -> bool
    where
        B: http_body::Body,
    {
        if response.extensions().get::<CompressionDisabled>().is_some() {
            return false;
        }

        self.0.should_compress(response)
    }
}

/// The compression layer for the router stack.
pub fn layer() -> CompressionLayer<SkipMarkedResponses> {
    CompressionLayer::new().compress_when(SkipMarkedResponses::default())
}

/// Tag the response when the request opted out of compression.
pub async fn mark_opt_out(request: Request, next: Next) -> Response {
    let opted_out = request.headers().contains_key(NO_COMPRESSION_HEADER);

    let mut response = next.run(request).await;

    if opted_out {
        response.extensions_mut().insert(CompressionDisabled);
    }

    response
}
