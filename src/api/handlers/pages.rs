//! Server-rendered pages.
//!
//! Protected pages re-derive the session from the token and run it through
//! the capability gate; they do not rely on the edge guard having run.

use super::auth::{current_view, login::safe_callback};
use crate::{
    access::{
        SessionView, gate, nav,
        routes::{self, CALLBACK_PARAM, LOGIN_PATH},
    },
    api::state::AppState,
};
use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
}

pub async fn login(Query(query): Query<LoginQuery>) -> Response {
    login_page(
        StatusCode::OK,
        safe_callback(query.callback_url.as_deref()),
        None,
    )
}

pub(crate) fn login_page(status: StatusCode, callback: &str, message: Option<&str>) -> Response {
    let mut body = String::from("<h1>Sign in</h1>");
    if let Some(message) = message {
        body.push_str(&format!(
            r#"<p class="login-error" role="alert">{}</p>"#,
            escape_html(message)
        ));
    }
    body.push_str(&format!(
        r#"<form method="post" action="{LOGIN_PATH}">
<input type="hidden" name="{CALLBACK_PARAM}" value="{}">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>"#,
        escape_html(callback)
    ));
    (status, Html(document("Sign in", "", &body))).into_response()
}

/// Target of the edge guard rewrite. Always `403`.
pub async fn forbidden(headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let view = current_view(&headers, &state);
    let body = format!("<h1>Forbidden</h1>{}", gate::FORBIDDEN_NOTICE);
    (
        StatusCode::FORBIDDEN,
        Html(document("Forbidden", &nav_html(&view), &body)),
    )
        .into_response()
}

pub async fn root() -> Redirect {
    Redirect::temporary(routes::PROTECTED_ROUTES[0].page)
}

/// Shell for every page in the classification table. The data itself is
/// loaded from the resource's JSON endpoint.
pub async fn protected(uri: Uri, headers: HeaderMap, state: Extension<Arc<AppState>>) -> Response {
    let path = uri.path();
    let Some(route) = routes::classify(path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let view = current_view(&headers, &state);
    let allowed = routes::allowed_roles_for(path);
    let outcome = gate::evaluate(&view, allowed);
    let content = gate::render(&view, allowed, || {
        format!(
            r#"<h1>{label}</h1><section class="resource" data-source="{api}" aria-live="polite"></section>"#,
            label = escape_html(route.label),
            api = route.api,
        )
    });

    let status = match outcome {
        gate::GateOutcome::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::OK,
    };
    (status, Html(document(route.label, &nav_html(&view), &content))).into_response()
}

/// Navigation for the caller's role plus the sign-out control.
fn nav_html(view: &SessionView) -> String {
    if !view.is_authenticated() {
        return String::new();
    }
    let mut html = String::from("<nav><ul>");
    for entry in nav::visible_for(view.role()) {
        html.push_str(&format!(
            r#"<li><a href="{}">{}</a></li>"#,
            escape_html(&entry.href),
            escape_html(&entry.label)
        ));
    }
    html.push_str("</ul>");
    if let Some(name) = view.user().and_then(|user| user.name.as_deref()) {
        html.push_str(&format!(
            r#"<span class="user">{}</span>"#,
            escape_html(name)
        ));
    }
    html.push_str(
        r#"<form method="post" action="/logout"><button type="submit">Sign out</button></form></nav>"#,
    );
    html
}

fn document(title: &str, nav: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} · reviewdesk</title></head>
<body>{nav}<main>{body}</main></body>
</html>"#,
        title = escape_html(title),
    )
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
