//! Shared, immutable request state.

use crate::{
    access::{CredentialIssuer, SessionTokenCodec},
    reviews::ReviewApi,
};
use std::sync::Arc;

pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    public_url: String,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(public_url: String) -> Self {
        Self {
            public_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Only mark cookies secure when the site is served over HTTPS.
    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

pub struct AppState {
    codec: Arc<dyn SessionTokenCodec>,
    issuer: Arc<dyn CredentialIssuer>,
    reviews: ReviewApi,
    config: AuthConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        codec: Arc<dyn SessionTokenCodec>,
        issuer: Arc<dyn CredentialIssuer>,
        reviews: ReviewApi,
        config: AuthConfig,
    ) -> Self {
        Self {
            codec,
            issuer,
            reviews,
            config,
        }
    }

    #[must_use]
    pub fn codec(&self) -> &dyn SessionTokenCodec {
        self.codec.as_ref()
    }

    #[must_use]
    pub fn issuer(&self) -> &dyn CredentialIssuer {
        self.issuer.as_ref()
    }

    #[must_use]
    pub fn reviews(&self) -> &ReviewApi {
        &self.reviews
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
