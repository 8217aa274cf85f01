use super::clear_session_cookie;
use crate::{access::routes::LOGIN_PATH, api::state::AppState};
use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
/// Tokens are stateless, so logout only expires the cookie.
pub async fn logout(state: Extension<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, cleared_cookie_headers(&state))
}

/// Sign-out button on the pages: clear the cookie and go back to the login page.
pub async fn logout_form(state: Extension<Arc<AppState>>) -> impl IntoResponse {
    (cleared_cookie_headers(&state), Redirect::to(LOGIN_PATH))
}

fn cleared_cookie_headers(state: &AppState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match clear_session_cookie(state.config()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build logout cookie: {err}"),
    }
    headers
}
