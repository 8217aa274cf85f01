//! Authorization pipeline: roles, identity, claims, tokens, sessions and the
//! checkpoints that enforce them.

pub mod claims;
pub mod gate;
pub mod identity;
pub mod nav;
pub mod role;
pub mod routes;
pub mod session;
pub mod token;

pub use claims::{ClaimSet, map_claims};
pub use identity::{CredentialIssuer, Credentials, IdentityRecord, IssuerError, RemoteIssuer};
pub use role::Role;
pub use session::{Session, SessionShell, SessionView, materialize};
pub use token::{PasetoCodec, SessionTokenCodec, TokenError};
