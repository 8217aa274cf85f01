use super::auth::current_view;
use crate::{
    access::nav::{self, NavEntry},
    api::state::AppState,
};
use axum::{Json, extract::Extension, http::HeaderMap};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/navigation",
    responses(
        (status = 200, description = "Navigation entries the caller may use", body = [NavEntry])
    ),
    tag = "navigation"
)]
/// Anonymous callers get an empty list.
pub async fn navigation(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Json<Vec<NavEntry>> {
    let view = current_view(&headers, &state);
    Json(nav::visible_for(view.role()))
}
