//! JSON data endpoints proxied to the review service.
//!
//! These paths sit outside the edge matcher, so each handler checks the
//! classification table itself before any upstream call is made.

use super::auth::current_claims;
use crate::{
    access::routes::{self, AccessDenied},
    api::state::AppState,
    http::HttpError,
    reviews::Page,
};
use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error};

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(Page),
    responses(
        (status = 200, description = "Review queue page"),
        (status = 401, description = "No valid session"),
        (status = 502, description = "Review service unavailable")
    ),
    tag = "reviews"
)]
pub async fn reviews(
    uri: Uri,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    Query(page): Query<Page>,
) -> Response {
    if let Err(response) = authorize(&uri, &headers, &state) {
        return response;
    }
    relay(state.reviews().list(page).await)
}

#[utoipa::path(
    get,
    path = "/api/insights",
    responses(
        (status = 200, description = "Review insights"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Role not allowed"),
        (status = 502, description = "Review service unavailable")
    ),
    tag = "reviews"
)]
pub async fn insights(uri: Uri, headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    if let Err(response) = authorize(&uri, &headers, &state) {
        return response;
    }
    relay(state.reviews().insights().await)
}

#[utoipa::path(
    get,
    path = "/api/audit-log",
    params(Page),
    responses(
        (status = 200, description = "Audit log page"),
        (status = 401, description = "No valid session"),
        (status = 403, description = "Role not allowed"),
        (status = 502, description = "Review service unavailable")
    ),
    tag = "reviews"
)]
pub async fn audit_log(
    uri: Uri,
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    Query(page): Query<Page>,
) -> Response {
    if let Err(response) = authorize(&uri, &headers, &state) {
        return response;
    }
    relay(state.reviews().audit_log(page).await)
}

fn authorize(uri: &Uri, headers: &HeaderMap, state: &AppState) -> Result<(), Response> {
    let claims = current_claims(headers, state);
    let role = claims.as_ref().and_then(|claims| claims.role);
    match routes::require(uri.path(), role, claims.is_some()) {
        Ok(()) => Ok(()),
        Err(AccessDenied::Unauthenticated) => {
            Err(message(StatusCode::UNAUTHORIZED, "Authentication required"))
        }
        Err(AccessDenied::Forbidden) => {
            debug!(path = uri.path(), "role not allowed");
            Err(message(StatusCode::FORBIDDEN, "Forbidden"))
        }
    }
}

fn relay(result: Result<Value, HttpError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(HttpError::Status {
            status, message: msg, ..
        }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            message(status, &msg)
        }
        Err(err) => {
            error!("Review service call failed: {err}");
            message(StatusCode::BAD_GATEWAY, "Review service unavailable")
        }
    }
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_keeps_upstream_status_and_message() {
        let err = HttpError::from_response(404, br#"{"message":"Not Found"}"#);
        let response = relay(Err(err));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn relay_maps_decode_failures_to_bad_gateway() {
        let Err(err) = serde_json::from_str::<Value>("{") else {
            panic!("expected a parse error");
        };
        let response = relay(Err(HttpError::Decode(err)));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn relay_passes_values_through() {
        let response = relay(Ok(json!({"items": []})));
        assert_eq!(response.status(), StatusCode::OK);
    }
}
