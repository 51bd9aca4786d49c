//! API response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::auth::UserClaims;

/// Generic error body returned by failed API requests.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorDto {
    /// Human-readable error message.
    pub error: String,
}

/// Body returned by `GET /profile` for an authenticated user.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    /// Verified ID-token claims of the signed-in user.
    #[schema(value_type = Object)]
    pub user: UserClaims,
    /// Whether an access token was stored alongside the identity.
    pub has_access_token: bool,
    /// Seconds until the stored access token expires, when known.
    pub expires_in: Option<i64>,
}
