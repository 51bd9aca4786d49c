//! Gatehouse server application.
//!
//! Gatehouse is a server-rendered web portal placed behind OpenID Connect
//! sign-on. The crate is middleware assembly around well-known libraries:
//! tower-sessions for session state, the oauth2/jsonwebtoken pair for the
//! authorization-code flow, a session-backed CSRF synchronizer token,
//! security headers, response compression, request logging, and MiniJinja
//! templating. The interesting contract is the composition order, which is
//! wired up in [`router::build_router`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
pub mod view;
