//! Protected resource classification and the edge routing decision.
//!
//! `PROTECTED_ROUTES` is the single table every checkpoint reads: the edge
//! guard, the page gate, the JSON data API and the navigation filter. Do not
//! duplicate prefixes or role lists anywhere else.
//!
//! Only page prefixes are intercepted at the edge; everything else (login,
//! health, static assets, the JSON API) bypasses the guard and relies on its
//! own checks.

use super::{claims::ClaimSet, role::Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Any authenticated identity, whatever its role.
    Authenticated,
    /// Only the listed roles.
    Roles(&'static [Role]),
}

impl Access {
    #[must_use]
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::Authenticated => Role::ALL,
            Self::Roles(roles) => roles,
        }
    }

    /// `None` role means the token carried no role claim.
    #[must_use]
    pub fn permits(self, role: Option<Role>) -> bool {
        match self {
            Self::Authenticated => true,
            Self::Roles(roles) => role.is_some_and(|role| role.is_one_of(roles)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub label: &'static str,
    pub page: &'static str,
    pub api: &'static str,
    pub access: Access,
}

pub const PROTECTED_ROUTES: &[ProtectedRoute] = &[
    ProtectedRoute {
        label: "Review Queue",
        page: "/review",
        api: "/api/reviews",
        access: Access::Authenticated,
    },
    ProtectedRoute {
        label: "Insights",
        page: "/insights",
        api: "/api/insights",
        access: Access::Roles(&[Role::Admin]),
    },
    ProtectedRoute {
        label: "Audit Log",
        page: "/audit-log",
        api: "/api/audit-log",
        access: Access::Roles(&[Role::Admin]),
    },
];

pub const LOGIN_PATH: &str = "/login";
pub const FORBIDDEN_PATH: &str = "/forbidden";
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Segment-aware prefix test: `/insights` matches `/insights` and
/// `/insights/x`, not `/insightsx`.
#[must_use]
pub fn path_matches(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Classify a page or API path against the table.
#[must_use]
pub fn classify(path: &str) -> Option<&'static ProtectedRoute> {
    PROTECTED_ROUTES
        .iter()
        .find(|route| path_matches(path, route.page) || path_matches(path, route.api))
}

/// Edge matcher allow-list: page prefixes only.
#[must_use]
pub fn is_edge_matched(path: &str) -> bool {
    PROTECTED_ROUTES
        .iter()
        .any(|route| path_matches(path, route.page))
}

/// Allow-list handed to the page gate for `path`. `None` for unclassified paths.
#[must_use]
pub fn allowed_roles_for(path: &str) -> Option<&'static [Role]> {
    classify(path).map(|route| route.access.allowed_roles())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDecision {
    Continue,
    RedirectToLogin,
    RewriteToForbidden,
}

/// Edge guard decision for one request.
///
/// `claims` is the decoded token, `None` when it was absent or failed
/// verification. Unmatched paths continue without looking at the token.
#[must_use]
pub fn decide(path: &str, claims: Option<&ClaimSet>) -> EdgeDecision {
    if !is_edge_matched(path) {
        return EdgeDecision::Continue;
    }
    let Some(claims) = claims else {
        return EdgeDecision::RedirectToLogin;
    };
    match classify(path) {
        Some(route) if !route.access.permits(claims.role) => EdgeDecision::RewriteToForbidden,
        _ => EdgeDecision::Continue,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDenied {
    Unauthenticated,
    Forbidden,
}

/// Authorization check for handlers outside the edge matcher (the JSON API).
///
/// # Errors
/// `Unauthenticated` without a session, `Forbidden` when the role is not on
/// the route's allow-list.
pub fn require(path: &str, role: Option<Role>, authenticated: bool) -> Result<(), AccessDenied> {
    if !authenticated {
        return Err(AccessDenied::Unauthenticated);
    }
    match classify(path) {
        Some(route) if !route.access.permits(role) => Err(AccessDenied::Forbidden),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with(role: Option<Role>) -> ClaimSet {
        ClaimSet {
            id: Some("u1".to_string()),
            role,
            ..ClaimSet::default()
        }
    }

    #[test]
    fn path_matches_is_segment_aware() {
        assert!(path_matches("/insights", "/insights"));
        assert!(path_matches("/insights/weekly", "/insights"));
        assert!(!path_matches("/insightsx", "/insights"));
        assert!(!path_matches("/review", "/insights"));
    }

    #[test]
    fn classify_covers_pages_and_api() {
        assert_eq!(classify("/audit-log").map(|r| r.label), Some("Audit Log"));
        assert_eq!(classify("/api/audit-log").map(|r| r.label), Some("Audit Log"));
        assert_eq!(classify("/review/42").map(|r| r.label), Some("Review Queue"));
        assert_eq!(classify("/login"), None);
    }

    #[test]
    fn edge_matcher_excludes_public_and_api_paths() {
        assert!(is_edge_matched("/review"));
        assert!(is_edge_matched("/insights/q3"));
        assert!(!is_edge_matched("/"));
        assert!(!is_edge_matched("/login"));
        assert!(!is_edge_matched("/forbidden"));
        assert!(!is_edge_matched("/api/insights"));
    }

    #[test]
    fn unauthenticated_requests_redirect_on_every_matched_prefix() {
        for route in PROTECTED_ROUTES {
            assert_eq!(decide(route.page, None), EdgeDecision::RedirectToLogin);
            let nested = format!("{}/nested", route.page);
            assert_eq!(decide(&nested, None), EdgeDecision::RedirectToLogin);
        }
    }

    #[test]
    fn roles_off_the_allow_list_are_rewritten_to_forbidden() {
        for route in PROTECTED_ROUTES {
            for role in Role::ALL {
                let decision = decide(route.page, Some(&claims_with(Some(*role))));
                if role.is_one_of(route.access.allowed_roles()) {
                    assert_eq!(decision, EdgeDecision::Continue, "{role} on {}", route.page);
                } else {
                    assert_eq!(
                        decision,
                        EdgeDecision::RewriteToForbidden,
                        "{role} on {}",
                        route.page
                    );
                }
            }
        }
    }

    #[test]
    fn reviewer_is_forbidden_from_audit_log() {
        let claims = claims_with(Some(Role::Reviewer));
        assert_eq!(
            decide("/audit-log", Some(&claims)),
            EdgeDecision::RewriteToForbidden
        );
        assert_eq!(decide("/review", Some(&claims)), EdgeDecision::Continue);
    }

    #[test]
    fn admin_continues_to_insights() {
        let claims = claims_with(Some(Role::Admin));
        assert_eq!(decide("/insights", Some(&claims)), EdgeDecision::Continue);
    }

    #[test]
    fn missing_role_claim_is_not_admin() {
        let claims = claims_with(None);
        assert_eq!(
            decide("/insights", Some(&claims)),
            EdgeDecision::RewriteToForbidden
        );
        assert_eq!(decide("/review", Some(&claims)), EdgeDecision::Continue);
    }

    #[test]
    fn unmatched_paths_bypass_the_guard() {
        assert_eq!(decide("/login", None), EdgeDecision::Continue);
        assert_eq!(decide("/health", None), EdgeDecision::Continue);
    }

    #[test]
    fn require_maps_to_api_outcomes() {
        assert_eq!(
            require("/api/insights", None, false),
            Err(AccessDenied::Unauthenticated)
        );
        assert_eq!(
            require("/api/insights", Some(Role::Reviewer), true),
            Err(AccessDenied::Forbidden)
        );
        assert_eq!(require("/api/insights", Some(Role::Admin), true), Ok(()));
        assert_eq!(require("/api/reviews", Some(Role::Reviewer), true), Ok(()));
    }

    #[test]
    fn allowed_roles_come_from_the_table() {
        assert_eq!(allowed_roles_for("/insights"), Some(&[Role::Admin][..]));
        assert_eq!(allowed_roles_for("/review"), Some(Role::ALL));
        assert_eq!(allowed_roles_for("/login"), None);
    }
}
