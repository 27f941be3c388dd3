//! API endpoints.

mod auth;
mod forms;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use users::UserResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/forms", forms::router())
}
