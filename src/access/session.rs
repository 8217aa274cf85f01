//! Session materialization and the request-scoped session view.
//!
//! `materialize` is the only place claims become a [`Session`]. The view wraps
//! the result in a small state machine (`loading -> authenticated |
//! unauthenticated`) so gating code cannot branch on a role before the token
//! has been decoded.

use super::{claims::ClaimSet, role::Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Session object before the pipeline's claims are merged in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionShell {
    pub user: SessionUser,
    pub expires: Option<String>,
}

impl SessionShell {
    /// Default shell: profile fields and expiry straight from the claims.
    #[must_use]
    pub fn from_claims(claims: &ClaimSet) -> Self {
        Self {
            user: SessionUser {
                name: claims.name.clone(),
                email: claims.email.clone(),
                id: None,
                role: None,
            },
            expires: claims.exp.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub user: SessionUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

impl Session {
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.role
    }
}

/// Session materializer: merge `id` and `role` from the claims into the shell.
///
/// Additive: shell fields are never dropped, and a claim that is absent
/// leaves the shell's value in place.
#[must_use]
pub fn materialize(shell: SessionShell, claims: &ClaimSet) -> Session {
    let SessionShell { mut user, expires } = shell;
    if let Some(id) = &claims.id {
        user.id = Some(id.clone());
    }
    if let Some(role) = claims.role {
        user.role = Some(role);
    }
    Session { user, expires }
}

/// Convenience for the common path: default shell plus materialize.
#[must_use]
pub fn session_from_claims(claims: &ClaimSet) -> Session {
    materialize(SessionShell::from_claims(claims), claims)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Request-scoped projection handed to gating code. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    status: SessionStatus,
    session: Option<Session>,
}

impl SessionView {
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            session: None,
        }
    }

    /// Already-resolved view for callers that decode synchronously.
    #[must_use]
    pub fn from_session(session: Option<Session>) -> Self {
        let mut view = Self::loading();
        view.resolve(session);
        view
    }

    /// Settle a loading view. Returns `false` and leaves the view unchanged if
    /// it was already resolved.
    pub fn resolve(&mut self, session: Option<Session>) -> bool {
        if self.status != SessionStatus::Loading {
            return false;
        }
        self.status = if session.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        };
        self.session = session;
        true
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|session| &session.user)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().and_then(Session::role)
    }
}
