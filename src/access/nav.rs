//! Navigation affordances filtered by role.
//!
//! Cosmetic only: hiding a link is not a security boundary, the edge guard and
//! page gate are.

use super::{
    role::Role,
    routes::{PROTECTED_ROUTES, ProtectedRoute},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    pub label: String,
    pub href: String,
    pub allowed_roles: Vec<Role>,
}

impl From<&ProtectedRoute> for NavEntry {
    fn from(route: &ProtectedRoute) -> Self {
        Self {
            label: route.label.to_string(),
            href: route.page.to_string(),
            allowed_roles: route.access.allowed_roles().to_vec(),
        }
    }
}

/// All navigation entries, in classification table order.
#[must_use]
pub fn entries() -> Vec<NavEntry> {
    PROTECTED_ROUTES.iter().map(NavEntry::from).collect()
}

/// Entries usable by `role`. `None` (no session or no role claim) sees none.
#[must_use]
pub fn visible_for(role: Option<Role>) -> Vec<NavEntry> {
    let Some(role) = role else {
        return Vec::new();
    };
    entries()
        .into_iter()
        .filter(|entry| role.is_one_of(&entry.allowed_roles))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[NavEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    #[test]
    fn reviewer_does_not_see_admin_entries() {
        let visible = visible_for(Some(Role::Reviewer));
        assert_eq!(labels(&visible), vec!["Review Queue"]);
        assert!(!labels(&visible).contains(&"Audit Log"));
    }

    #[test]
    fn admin_sees_everything_in_table_order() {
        let visible = visible_for(Some(Role::Admin));
        assert_eq!(
            labels(&visible),
            vec!["Review Queue", "Insights", "Audit Log"]
        );
    }

    #[test]
    fn no_role_sees_nothing() {
        assert!(visible_for(None).is_empty());
    }

    #[test]
    fn entries_mirror_the_classification_table() {
        let entries = entries();
        assert_eq!(entries.len(), PROTECTED_ROUTES.len());
        for (entry, route) in entries.iter().zip(PROTECTED_ROUTES) {
            assert_eq!(entry.href, route.page);
            assert_eq!(entry.allowed_roles, route.access.allowed_roles());
        }
    }

    #[test]
    fn entry_serializes_with_camel_case_roles() -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(NavEntry::from(&PROTECTED_ROUTES[1]))?;
        assert_eq!(
            value,
            serde_json::json!({
                "label": "Insights",
                "href": "/insights",
                "allowedRoles": ["ADMIN"]
            })
        );
        Ok(())
    }
}
