//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use formhub_common::AppResult;
use formhub_core::CreateUserInput;
use serde::Deserialize;
use validator::Validate;

use crate::{
    endpoints::users::UserResponse,
    middleware::{AppState, SESSION_COOKIE},
    response::{ApiResponse, ok},
};

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Create a new account and log in.
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> AppResult<(CookieJar, ApiResponse<UserResponse>)> {
    req.validate()?;

    let input = CreateUserInput {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password: req.password,
    };

    let (user, session) = state.user_service.signup(input).await?;

    Ok((
        jar.add(session_cookie(session.id)),
        ApiResponse::ok(user.into()),
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Log in to an existing account.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<UserResponse>)> {
    let (user, session) = state
        .user_service
        .login(&req.username, &req.password)
        .await?;

    Ok((
        jar.add(session_cookie(session.id)),
        ApiResponse::ok(user.into()),
    ))
}

/// Log out: close the session and clear the cookie.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, impl axum::response::IntoResponse)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.user_service.logout(cookie.value()).await?;
    }

    Ok((jar.remove(Cookie::from(SESSION_COOKIE)), ok()))
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .build()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
