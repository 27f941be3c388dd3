//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use formhub_core::{FormService, PassageService, ResultsService, UserService};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub form_service: FormService,
    pub passage_service: PassageService,
    pub results_service: ResultsService,
}

/// Authentication middleware.
///
/// Resolves the session cookie to a user and stores it in the request
/// extensions; handlers opt in through the `AuthUser` extractor. Requests
/// without a valid session pass through unauthenticated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    if let Some(cookie) = jar.get(SESSION_COOKIE)
        && let Ok(user) = state
            .user_service
            .authenticate_by_session(cookie.value())
            .await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
