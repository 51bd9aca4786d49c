//! Tower middleware assembled by the router.
//!
//! Ordering matters and is fixed in the router: tracing and security
//! headers sit outermost, then compression, the session layer, the
//! absolute-lifetime check, the CSRF guard, the rate limiter, and finally
//! the per-request locals that handlers render with.

pub mod compression;
pub mod csrf;
pub mod headers;
pub mod locals;
pub mod rate_limit;
pub mod session_lifetime;
