//! Session endpoint with sliding expiry.

use super::{current_claims, seal, session_cookie};
use crate::{
    access::{Session, map_claims, session::session_from_claims},
    api::state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active, token refreshed", body = Session),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
/// Return the caller's session and re-issue the token with a fresh expiry.
///
/// The refresh runs the token mapper without an identity record, so the role
/// claim is carried forward unchanged.
pub async fn session(headers: HeaderMap, state: Extension<Arc<AppState>>) -> impl IntoResponse {
    // Missing or invalid tokens are "no session" to avoid leaking auth state.
    let Some(claims) = current_claims(&headers, &state) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let refreshed = map_claims(claims.clone(), None);
    let mut response_headers = HeaderMap::new();
    let claims = match seal(&state, refreshed) {
        Ok((token, stamped)) => {
            match session_cookie(state.config(), &token) {
                Ok(cookie) => {
                    response_headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build session cookie: {err}"),
            }
            stamped
        }
        Err(err) => {
            error!("Failed to refresh session token: {err}");
            claims
        }
    };

    let session: Session = session_from_claims(&claims);
    (StatusCode::OK, response_headers, Json(session)).into_response()
}
