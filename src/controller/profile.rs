//! Signed-in user endpoints.

use axum::Json;
use chrono::Utc;

use crate::{
    controller::PROFILE_TAG,
    extract::Identity,
    model::api::{ErrorDto, ProfileDto},
};

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/profile",
    tag = PROFILE_TAG,
    responses(
        (status = 200, description = "Profile of the signed-in user", body = ProfileDto),
        (status = 401, description = "No authenticated session", body = ErrorDto),
    )
)]
pub async fn profile(Identity(identity): Identity) -> Json<ProfileDto> {
    let expires_in = identity
        .token_expires_at
        .map(|at| (at - Utc::now()).num_seconds().max(0));

    Json(ProfileDto {
        user: identity.claims,
        has_access_token: identity.access_token.is_some(),
        expires_in,
    })
}
