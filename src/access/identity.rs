//! Identity records and the credential issuer seam.
//!
//! The issuer is external: this crate only consumes its output contract. A
//! record without a role fails to deserialize, so a provisioning defect turns
//! into a failed login instead of a silently defaulted role.

use super::role::Role;
use crate::http::{HttpClient, HttpError, RequestOptions};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{future::Future, pin::Pin};
use thiserror::Error;
use tracing::{error, instrument};

const AUTHENTICATE_ENDPOINT: &str = "/authenticate";

/// Verified identity produced by a successful authentication. Immutable for
/// the lifetime of the session minted from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Error)]
pub enum IssuerError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("identity record rejected: {0}")]
    MalformedIdentity(String),
    #[error("credential issuer unavailable: {0}")]
    Unavailable(String),
}

pub type IssuerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<IdentityRecord, IssuerError>> + Send + 'a>>;

/// Exchanges submitted credentials for a verified identity record.
pub trait CredentialIssuer: Send + Sync {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> IssuerFuture<'a>;
}

/// Issuer backed by an external identity service reachable over HTTP.
///
/// `POST {base}/authenticate` with `{email, password}`; `401`/`403` mean bad
/// credentials, any other failure is reported as unavailable.
#[derive(Clone, Debug)]
pub struct RemoteIssuer {
    client: HttpClient,
}

impl RemoteIssuer {
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, credentials))]
    async fn call(&self, credentials: &Credentials) -> Result<IdentityRecord, IssuerError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        let options = RequestOptions::post()
            .json(&body)
            .map_err(|err| IssuerError::Unavailable(err.to_string()))?;

        self.client
            .request::<IdentityRecord>(AUTHENTICATE_ENDPOINT, options)
            .await
            .map_err(map_issuer_error)
    }
}

impl CredentialIssuer for RemoteIssuer {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> IssuerFuture<'a> {
        Box::pin(self.call(credentials))
    }
}

fn map_issuer_error(err: HttpError) -> IssuerError {
    match err {
        HttpError::Status {
            status: 401 | 403, ..
        } => IssuerError::InvalidCredentials,
        HttpError::Decode(err) => {
            error!("Credential issuer returned a malformed identity record: {err}");
            IssuerError::MalformedIdentity(err.to_string())
        }
        other => {
            error!("Credential issuer call failed: {other}");
            IssuerError::Unavailable(other.to_string())
        }
    }
}
