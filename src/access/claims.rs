//! Session token claims and the token mapper.
//!
//! Flow Overview:
//! 1) At login, seed profile claims from the identity record.
//! 2) `map_claims` copies `id` and `role` from the identity into the claims.
//! 3) `stamp` sets `iat`/`exp`/`jti` right before the token is sealed.
//!
//! On refresh there is no identity record, so `map_claims` returns the claims
//! untouched: the role only ever comes from the original authentication.

use super::{identity::IdentityRecord, role::Role, token::TokenError};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
use ulid::Ulid;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl ClaimSet {
    /// Profile claims (`sub`, `name`, `email`) for a fresh login. Leaves `id`
    /// and `role` to [`map_claims`].
    #[must_use]
    pub fn from_profile(identity: &IdentityRecord) -> Self {
        Self {
            sub: Some(identity.id.clone()),
            name: Some(identity.display_name.clone()),
            email: Some(identity.email.clone()),
            ..Self::default()
        }
    }

    /// Set issuance timestamps and a fresh token id.
    ///
    /// # Errors
    /// Returns `TtlOutOfRange` if `now + ttl_seconds` is not a representable
    /// date, or `Timestamp` if the times cannot be formatted as RFC 3339.
    pub fn stamp(mut self, now: OffsetDateTime, ttl_seconds: i64) -> Result<Self, TokenError> {
        // Whole seconds keep the payload stable across encoders.
        let now = now.replace_nanosecond(0).unwrap_or(now);
        let exp = now
            .checked_add(Duration::seconds(ttl_seconds))
            .ok_or(TokenError::TtlOutOfRange(ttl_seconds))?;
        self.iat = Some(now.format(&Rfc3339)?);
        self.exp = Some(exp.format(&Rfc3339)?);
        self.jti = Some(Ulid::new().to_string());
        Ok(self)
    }
}

/// Token mapper: fold a fresh authentication into the claim set.
///
/// With an identity record, `id` and `role` are overwritten from it. Without
/// one (a refresh), the claims are returned unchanged.
#[must_use]
pub fn map_claims(mut existing: ClaimSet, identity: Option<&IdentityRecord>) -> ClaimSet {
    if let Some(identity) = identity {
        existing.id = Some(identity.id.clone());
        existing.role = Some(identity.role);
    }
    existing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str, role: Role) -> IdentityRecord {
        IdentityRecord {
            id: id.to_string(),
            display_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn map_claims_copies_id_and_role_from_identity() {
        let claims = map_claims(ClaimSet::default(), Some(&identity("u1", Role::Admin)));
        assert_eq!(claims.id.as_deref(), Some("u1"));
        assert_eq!(claims.role, Some(Role::Admin));
    }

    #[test]
    fn map_claims_overwrites_stale_values() {
        let stale = ClaimSet {
            id: Some("old".to_string()),
            role: Some(Role::Admin),
            name: Some("kept".to_string()),
            ..ClaimSet::default()
        };
        let claims = map_claims(stale, Some(&identity("u2", Role::Reviewer)));
        assert_eq!(claims.id.as_deref(), Some("u2"));
        assert_eq!(claims.role, Some(Role::Reviewer));
        assert_eq!(claims.name.as_deref(), Some("kept"));
    }

    #[test]
    fn map_claims_without_identity_is_identity_function() {
        let existing = ClaimSet {
            sub: Some("u1".to_string()),
            id: Some("u1".to_string()),
            role: Some(Role::Reviewer),
            exp: Some("2030-01-01T00:00:00Z".to_string()),
            ..ClaimSet::default()
        };
        assert_eq!(map_claims(existing.clone(), None), existing);
    }

    #[test]
    fn map_claims_never_invents_a_role() {
        let claims = map_claims(ClaimSet::default(), None);
        assert_eq!(claims.role, None);
    }

    #[test]
    fn from_profile_leaves_id_and_role_unset() {
        let claims = ClaimSet::from_profile(&identity("u1", Role::Admin));
        assert_eq!(claims.sub.as_deref(), Some("u1"));
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.id, None);
        assert_eq!(claims.role, None);
    }

    #[test]
    fn stamp_sets_timestamps_and_keeps_role() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000)?;
        let claims = map_claims(ClaimSet::default(), Some(&identity("u1", Role::Admin)))
            .stamp(now, 60)?;
        assert_eq!(claims.iat.as_deref(), Some("2023-11-14T22:13:20Z"));
        assert_eq!(claims.exp.as_deref(), Some("2023-11-14T22:14:20Z"));
        assert!(claims.jti.is_some());
        assert_eq!(claims.role, Some(Role::Admin));
        Ok(())
    }

    #[test]
    fn stamp_rejects_ttl_past_the_calendar() -> anyhow::Result<()> {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000)?;
        let result = ClaimSet::default().stamp(now, 999_999_999_999);
        assert!(matches!(
            result,
            Err(TokenError::TtlOutOfRange(999_999_999_999))
        ));
        Ok(())
    }

    #[test]
    fn claims_skip_absent_fields_when_serialized() -> Result<(), serde_json::Error> {
        let claims = map_claims(ClaimSet::default(), Some(&identity("u1", Role::Admin)));
        let value = serde_json::to_value(&claims)?;
        assert_eq!(value, serde_json::json!({"id": "u1", "role": "ADMIN"}));
        Ok(())
    }
}
