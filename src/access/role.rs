//! Closed role set carried by every identity and session token.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Reviewer,
    Admin,
}

impl Role {
    pub const ALL: &'static [Role] = &[Role::Reviewer, Role::Admin];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reviewer => "REVIEWER",
            Self::Admin => "ADMIN",
        }
    }

    /// Membership test against an explicit allow-list. There is no implied
    /// hierarchy between roles.
    #[must_use]
    pub fn is_one_of(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "REVIEWER" => Ok(Self::Reviewer),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}
