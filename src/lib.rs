//! # Reviewdesk (review queue with role-gated admin views)
//!
//! `reviewdesk` serves a shared review queue to reviewers and admins, plus
//! admin-only insights and audit-log views. Review data lives in an external
//! service; this crate owns the authorization pipeline in front of it.
//!
//! ## Authorization pipeline
//!
//! 1. **Login:** a credential issuer turns email/password into an identity
//!    record carrying exactly one role (`REVIEWER` or `ADMIN`).
//! 2. **Token:** the role is copied into the claim set and sealed in a
//!    `PASETO` `v4.public` session token (cookie or bearer header).
//! 3. **Session:** every request that needs identity decodes the token and
//!    materializes a session exposing `{id, role}`.
//! 4. **Enforcement:** the claim is checked at the edge guard (before any
//!    page code), again by the page gate, and navigation hides links a role
//!    cannot use. All checkpoints read the same classification table in
//!    [`access::routes`].
//!
//! Authentication failures redirect to `/login`; authorization failures render
//! a forbidden view. Neither is surfaced to page code as an error.

pub mod access;
pub mod api;
pub mod cli;
pub mod http;
pub mod reviews;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
