//! HTTP request handlers.

pub mod auth;
pub mod pages;
pub mod profile;

/// OpenAPI tag for the authentication flow.
pub const AUTH_TAG: &str = "auth";
/// OpenAPI tag for signed-in user endpoints.
pub const PROFILE_TAG: &str = "profile";
