//! Identity claims model.

use serde::{Deserialize, Serialize};

/// Claims extracted from a verified ID token.
///
/// Standard claims the portal cares about are typed; everything else the
/// provider sends is preserved in `extra` so templates and API consumers can
/// still reach provider-specific fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserClaims {
    /// Subject identifier, unique per user at the issuer.
    pub sub: String,
    /// Display name, when the `profile` scope was granted.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address, when the `email` scope was granted.
    #[serde(default)]
    pub email: Option<String>,
    /// Replay-protection nonce echoed back by the provider.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Expiry of the ID token itself (unix seconds).
    pub exp: i64,
    /// Issued-at timestamp (unix seconds).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Any remaining claims, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
