//! Data models shared across the server.

pub mod api;
pub mod app;
pub mod auth;
pub mod session;
