//! Page-level capability gate.
//!
//! Pages wrap their content in [`render`]. The gate never redirects: an
//! unauthenticated view renders nothing, a role off the allow-list renders the
//! forbidden notice, and the children closure runs only for [`GateOutcome::Render`].

use super::{role::Role, session::SessionView};

pub const LOADING_PLACEHOLDER: &str = r#"<div class="gate-loading" aria-busy="true">Loading…</div>"#;
pub const FORBIDDEN_NOTICE: &str =
    r#"<div class="gate-forbidden" role="alert">You do not have access to this page.</div>"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Loading,
    Nothing,
    Forbidden,
    Render,
}

#[must_use]
pub fn evaluate(view: &SessionView, allowed_roles: Option<&[Role]>) -> GateOutcome {
    if view.is_loading() {
        return GateOutcome::Loading;
    }
    if !view.is_authenticated() {
        return GateOutcome::Nothing;
    }
    match allowed_roles {
        Some(allowed) if !view.role().is_some_and(|role| role.is_one_of(allowed)) => {
            GateOutcome::Forbidden
        }
        _ => GateOutcome::Render,
    }
}

/// Evaluate the gate and produce the markup for its outcome.
pub fn render<F>(view: &SessionView, allowed_roles: Option<&[Role]>, children: F) -> String
where
    F: FnOnce() -> String,
{
    match evaluate(view, allowed_roles) {
        GateOutcome::Loading => LOADING_PLACEHOLDER.to_string(),
        GateOutcome::Nothing => String::new(),
        GateOutcome::Forbidden => FORBIDDEN_NOTICE.to_string(),
        GateOutcome::Render => children(),
    }
}
