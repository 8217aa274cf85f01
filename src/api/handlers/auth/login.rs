//! Credential login: JSON for API clients, form post for the login page.

use super::{LoginRequest, SignInError, session_cookie, sign_in};
use crate::{
    access::{Session, routes::PROTECTED_ROUTES},
    api::{handlers::pages, state::AppState},
};
use axum::{
    Form, Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument};
use url::Url;

/// Placeholder origin used to resolve callbacks; only its identity matters.
const CALLBACK_ORIGIN: &str = "http://reviewdesk.invalid";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued, cookie set", body = Session),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Credential issuer unavailable")
    ),
    tag = "auth"
)]
#[instrument(skip(state, request))]
pub async fn login(
    state: Extension<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    match sign_in(&state, request.email, request.password).await {
        Ok((token, session)) => match session_cookie(state.config(), &token) {
            Ok(cookie) => {
                let mut headers = HeaderMap::new();
                headers.insert(SET_COOKIE, cookie);
                (StatusCode::OK, headers, Json(session)).into_response()
            }
            Err(err) => {
                error!("Failed to build session cookie: {err}");
                error_response(&SignInError::Internal)
            }
        },
        Err(err) => error_response(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Form login from the HTML page. Redirects to the callback on success and
/// re-renders the page with a message on failure.
#[instrument(skip(state, form))]
pub async fn login_form(state: Extension<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let callback = safe_callback(form.callback_url.as_deref());
    match sign_in(&state, form.email, form.password).await {
        Ok((token, _session)) => match session_cookie(state.config(), &token) {
            Ok(cookie) => {
                let mut headers = HeaderMap::new();
                headers.insert(SET_COOKIE, cookie);
                (headers, Redirect::to(callback)).into_response()
            }
            Err(err) => {
                error!("Failed to build session cookie: {err}");
                let err = SignInError::Internal;
                pages::login_page(err.status(), callback, Some(err.message()))
            }
        },
        Err(err) => pages::login_page(err.status(), callback, Some(err.message())),
    }
}

fn error_response(err: &SignInError) -> Response {
    (err.status(), Json(json!({"message": err.message()}))).into_response()
}

/// Only same-origin absolute paths are followed after login; anything else
/// lands on the review queue.
pub(crate) fn safe_callback(callback: Option<&str>) -> &str {
    callback
        .map(str::trim)
        .filter(|path| is_local_path(path))
        .unwrap_or(PROTECTED_ROUTES[0].page)
}

// Browsers drop tabs and newlines from URLs, so only printable ASCII is kept.
fn is_local_path(path: &str) -> bool {
    if !path.starts_with('/')
        || path.starts_with("//")
        || path.contains('\\')
        || !path.bytes().all(|byte| byte.is_ascii_graphic())
    {
        return false;
    }
    let Ok(origin) = Url::parse(CALLBACK_ORIGIN) else {
        return false;
    };
    origin
        .join(path)
        .is_ok_and(|joined| joined.origin() == origin.origin())
}
