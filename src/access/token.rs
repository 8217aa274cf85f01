//! Session token sealing and verification (PASETO `v4.public`).
//!
//! The application treats the token as an opaque capability: claims go in at
//! login, claims come out on every request. Signing and verification are
//! delegated to `pasetors`; the footer carries the PASERK id of the signing
//! key so a rotated key is rejected with `UnknownKid` rather than a generic
//! signature failure. Never log token material.

use super::claims::ClaimSet;
use base64ct::{Base64, Encoding};
use ed25519_dalek::SigningKey;
use pasetors::{
    Public,
    errors::Error as PasetorsError,
    footer::Footer,
    keys::{AsymmetricPublicKey, AsymmetricSecretKey},
    paserk::{FormatAsPaserk, Id},
    token::UntrustedToken,
    version4::{PublicToken, V4},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Tolerated clock drift for `iat` in the future.
const MAX_IAT_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid footer")]
    InvalidFooter,
    #[error("missing footer")]
    MissingFooter,
    #[error("unknown key id: {0}")]
    UnknownKid(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("invalid issued-at")]
    InvalidIat,
    #[error("invalid expiration")]
    InvalidExp,
    #[error("token expired")]
    Expired,
    #[error("invalid signing key")]
    InvalidKey,
    #[error("failed to sign token")]
    Signing,
    #[error("failed to format timestamps: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("session ttl out of range: {0}s")]
    TtlOutOfRange(i64),
}

/// Seal and open session tokens.
pub trait SessionTokenCodec: Send + Sync {
    /// Seal `claims` into a token.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be encoded or signed.
    fn encode(&self, claims: &ClaimSet) -> Result<String, TokenError>;

    /// Verify `token` and return its claims. Decoding the same valid token
    /// twice yields identical claims.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, signed by another key,
    /// tampered with, or expired at `now_unix_seconds`.
    fn decode(&self, token: &str, now_unix_seconds: i64) -> Result<ClaimSet, TokenError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFooter {
    kid: String,
}

pub struct PasetoCodec {
    secret_key: AsymmetricSecretKey<V4>,
    public_key: AsymmetricPublicKey<V4>,
    key_id: String,
}

impl std::fmt::Debug for PasetoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasetoCodec")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl PasetoCodec {
    /// Build a codec from a 32-byte Ed25519 seed.
    ///
    /// # Errors
    /// Returns an error if the derived key material is rejected.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, TokenError> {
        let signing_key = SigningKey::from_bytes(seed);
        let secret_key = AsymmetricSecretKey::<V4>::from(&signing_key.to_keypair_bytes())
            .map_err(|_| TokenError::InvalidKey)?;
        let public_key =
            AsymmetricPublicKey::<V4>::from(signing_key.verifying_key().as_bytes().as_slice())
                .map_err(|_| TokenError::InvalidKey)?;
        let key_id = format_kid(&public_key)?;
        Ok(Self {
            secret_key,
            public_key,
            key_id,
        })
    }

    /// Build a codec from a standard base64 encoded 32-byte seed.
    ///
    /// # Errors
    /// Returns an error if the value is not base64 or not 32 bytes long.
    pub fn from_base64_seed(seed_b64: &str) -> Result<Self, TokenError> {
        let raw = Base64::decode_vec(seed_b64.trim()).map_err(|_| TokenError::Base64)?;
        let seed: [u8; 32] = raw
            .as_slice()
            .try_into()
            .map_err(|_| TokenError::InvalidKey)?;
        Self::from_seed(&seed)
    }

    /// PASERK id (`k4.pid.*`) of the verification key.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl SessionTokenCodec for PasetoCodec {
    fn encode(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims)?;
        let footer = serde_json::to_vec(&TokenFooter {
            kid: self.key_id.clone(),
        })?;
        PublicToken::sign(&self.secret_key, &payload, Some(&footer), None)
            .map_err(|_| TokenError::Signing)
    }

    fn decode(&self, token: &str, now_unix_seconds: i64) -> Result<ClaimSet, TokenError> {
        let untrusted =
            UntrustedToken::<Public, V4>::try_from(token).map_err(|err| map_paseto_error(&err))?;
        let footer_bytes = untrusted.untrusted_footer();
        if footer_bytes.is_empty() {
            return Err(TokenError::MissingFooter);
        }
        let kid = footer_kid(footer_bytes)?;
        if kid != self.key_id {
            return Err(TokenError::UnknownKid(kid));
        }

        let trusted = PublicToken::verify(&self.public_key, &untrusted, None, None)
            .map_err(|err| map_paseto_error(&err))?;
        let claims: ClaimSet = serde_json::from_str(trusted.payload())?;
        validate_times(&claims, now_unix_seconds)?;
        Ok(claims)
    }
}

fn validate_times(claims: &ClaimSet, now_unix_seconds: i64) -> Result<(), TokenError> {
    let exp = claims
        .exp
        .as_deref()
        .ok_or(TokenError::InvalidExp)
        .and_then(|value| unix_from_rfc3339(value).ok_or(TokenError::InvalidExp))?;
    if exp <= now_unix_seconds {
        return Err(TokenError::Expired);
    }

    if let Some(iat) = claims.iat.as_deref() {
        let iat = unix_from_rfc3339(iat).ok_or(TokenError::InvalidIat)?;
        if iat > now_unix_seconds + MAX_IAT_SKEW_SECONDS || iat >= exp {
            return Err(TokenError::InvalidIat);
        }
    }

    Ok(())
}

fn unix_from_rfc3339(value: &str) -> Option<i64> {
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .map(OffsetDateTime::unix_timestamp)
}

fn footer_kid(footer_bytes: &[u8]) -> Result<String, TokenError> {
    let mut footer = Footer::new();
    footer
        .parse_bytes(footer_bytes)
        .map_err(|_| TokenError::InvalidFooter)?;
    let kid = footer
        .get_claim("kid")
        .and_then(|value| value.as_str())
        .ok_or(TokenError::InvalidFooter)?;
    Ok(kid.to_string())
}

fn format_kid(key: &AsymmetricPublicKey<V4>) -> Result<String, TokenError> {
    let id = Id::from(key);
    let mut kid = String::new();
    id.fmt(&mut kid).map_err(|_| TokenError::InvalidKey)?;
    Ok(kid)
}

fn map_paseto_error(err: &PasetorsError) -> TokenError {
    match err {
        PasetorsError::Base64 => TokenError::Base64,
        PasetorsError::TokenValidation => TokenError::InvalidSignature,
        PasetorsError::FooterParsing => TokenError::InvalidFooter,
        _ => TokenError::TokenFormat,
    }
}
