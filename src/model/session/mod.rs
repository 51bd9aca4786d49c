//! Session data models.
//!
//! Type-safe wrappers for the values Gatehouse keeps in tower-sessions
//! storage: the pending login state for an in-flight OIDC flow, the
//! authenticated identity, the CSRF synchronizer token, and the session
//! start time used to enforce the absolute lifetime cap. Each wrapper owns
//! its session key and the insert/get/remove operations for it.

pub mod auth;
pub mod csrf;
pub mod identity;
pub mod lifetime;
