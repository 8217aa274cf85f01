//! Edge route guard.
//!
//! Wraps the whole router so a rewrite is routed again from scratch. Only
//! page prefixes from the classification table are inspected; everything
//! else passes through without touching the token.

use super::{handlers::auth::current_claims, state::AppState};
use crate::access::routes::{self, CALLBACK_PARAM, EdgeDecision, FORBIDDEN_PATH, LOGIN_PATH};
use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri, uri::PathAndQuery},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

pub async fn edge_guard(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if !routes::is_edge_matched(request.uri().path()) {
        return next.run(request).await;
    }

    let claims = current_claims(request.headers(), &state);
    match routes::decide(request.uri().path(), claims.as_ref()) {
        EdgeDecision::Continue => next.run(request).await,
        EdgeDecision::RedirectToLogin => {
            debug!(path = request.uri().path(), "edge guard: redirect to login");
            Redirect::temporary(&login_location(request.uri())).into_response()
        }
        EdgeDecision::RewriteToForbidden => {
            debug!(path = request.uri().path(), "edge guard: rewrite to forbidden");
            *request.uri_mut() = Uri::from_static(FORBIDDEN_PATH);
            let mut response = next.run(request).await;
            *response.status_mut() = StatusCode::FORBIDDEN;
            response
        }
    }
}

/// `/login?callbackUrl=<original path and query>`.
pub(crate) fn login_location(uri: &Uri) -> String {
    let target = uri.path_and_query().map_or("/", PathAndQuery::as_str);
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{LOGIN_PATH}?{CALLBACK_PARAM}={encoded}")
}
