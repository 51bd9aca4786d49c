//! Service-layer integrations.

pub mod oidc;
