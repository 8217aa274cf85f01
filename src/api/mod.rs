//! HTTP surface: router, middleware stack and server start-up.

pub mod guard;
pub mod handlers;
pub mod openapi;
pub mod state;

use self::{
    handlers::{
        auth::{login::login_form, logout::logout_form},
        pages,
    },
    state::AppState,
};
use crate::access::routes::{FORBIDDEN_PATH, LOGIN_PATH, PROTECTED_ROUTES};
use anyhow::Result;
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{any, get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

pub use self::openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Full application: pages and JSON API behind the edge guard.
///
/// The guard wraps the router instead of being added with `Router::layer`,
/// so a rewritten request is routed again.
pub fn app(state: Arc<AppState>) -> Router {
    let guarded = middleware::from_fn_with_state(state.clone(), guard::edge_guard)
        .layer(router(state));
    Router::new().fallback_service(guarded)
}

fn router(state: Arc<AppState>) -> Router {
    let (api, _openapi) = openapi::api_router().split_for_parts();

    let router = PROTECTED_ROUTES
        .iter()
        .fold(api, |router, route| {
            router.route(route.page, get(pages::protected))
        })
        .route("/", get(pages::root))
        .route(LOGIN_PATH, get(pages::login).post(login_form))
        .route("/logout", post(logout_form))
        .route(FORBIDDEN_PATH, any(pages::forbidden));

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static(REQUEST_ID_HEADER),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(state)),
    )
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn new(port: u16, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// Headers are left out: they carry the session token.
fn make_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = route,
        request_id
    )
}
