//! Session transport and login plumbing shared by the auth endpoints, the
//! edge guard and the pages.
//!
//! Tokens travel in the `reviewdesk_session` cookie or as a bearer header.
//! A token that fails verification is treated exactly like a missing one.

pub mod login;
pub mod logout;
pub mod session;

use crate::{
    access::{
        ClaimSet, Credentials, IssuerError, Session, SessionView, TokenError, map_claims,
        session::session_from_claims,
    },
    api::state::{AppState, AuthConfig},
};
use axum::http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{AUTHORIZATION, COOKIE, InvalidHeaderValue},
};
use regex::Regex;
use secrecy::SecretString;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, error};
use utoipa::ToSchema;

pub const SESSION_COOKIE_NAME: &str = "reviewdesk_session";

#[derive(ToSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    #[schema(value_type = String, format = Password)]
    pub password: SecretString,
}

pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Failure of the shared login flow, mapped to a status by each caller.
#[derive(Debug)]
pub(crate) enum SignInError {
    InvalidInput,
    InvalidCredentials,
    Upstream,
    Internal,
}

impl SignInError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Upstream => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "A valid email and password are required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::Upstream => "Sign-in is temporarily unavailable",
            Self::Internal => "Failed to create session",
        }
    }
}

/// Authenticate, map the identity into fresh claims and seal the token.
pub(crate) async fn sign_in(
    state: &AppState,
    email: String,
    password: SecretString,
) -> Result<(String, Session), SignInError> {
    let email = email.trim().to_string();
    if !valid_email(&email) {
        return Err(SignInError::InvalidInput);
    }

    let credentials = Credentials { email, password };
    let identity = state
        .issuer()
        .authenticate(&credentials)
        .await
        .map_err(|err| match err {
            IssuerError::InvalidCredentials => SignInError::InvalidCredentials,
            IssuerError::MalformedIdentity(_) | IssuerError::Unavailable(_) => {
                SignInError::Upstream
            }
        })?;

    let claims = map_claims(ClaimSet::from_profile(&identity), Some(&identity));
    let (token, claims) = seal(state, claims).map_err(|err| {
        error!("Failed to seal session token: {err}");
        SignInError::Internal
    })?;
    debug!(role = %identity.role, "session issued");

    Ok((token, session_from_claims(&claims)))
}

/// Stamp issuance times on `claims` and seal them. Returns the token and the
/// stamped claims it carries.
pub(crate) fn seal(state: &AppState, claims: ClaimSet) -> Result<(String, ClaimSet), TokenError> {
    let claims = claims.stamp(
        OffsetDateTime::now_utc(),
        state.config().session_ttl_seconds(),
    )?;
    let token = state.codec().encode(&claims)?;
    Ok((token, claims))
}

/// Decode the caller's token, if any. Invalid tokens yield `None`.
pub(crate) fn current_claims(headers: &HeaderMap, state: &AppState) -> Option<ClaimSet> {
    let token = extract_session_token(headers)?;
    match state
        .codec()
        .decode(&token, OffsetDateTime::now_utc().unix_timestamp())
    {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("Rejected session token: {err}");
            None
        }
    }
}

/// Resolved session view for the caller.
pub(crate) fn current_view(headers: &HeaderMap, state: &AppState) -> SessionView {
    let mut view = SessionView::loading();
    view.resolve(current_claims(headers, state).as_ref().map(session_from_claims));
    view
}

/// Build a secure `HttpOnly` cookie for the session token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let (key, val) = pair.trim().split_once('=')?;
        (key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty())
            .then(|| val.trim().to_string())
    })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
