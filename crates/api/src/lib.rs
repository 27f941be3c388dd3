//! HTTP API layer for formhub.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, users, forms, passages, results
//! - **Extractors**: session-based authentication
//! - **Middleware**: session cookie resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, SESSION_COOKIE, auth_middleware};
