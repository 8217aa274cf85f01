use crate::{
    access::{PasetoCodec, RemoteIssuer},
    api::{
        self,
        state::{AppState, AuthConfig},
    },
    http::HttpClient,
    reviews::ReviewApi,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub public_url: String,
    pub session_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub review_api_url: String,
    pub identity_api_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the session secret is invalid, an HTTP client cannot
/// be built, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let state = build_state(&args)?;
    log_startup_args(&args, &state);
    api::new(args.port, Arc::new(state)).await
}

fn build_state(args: &Args) -> Result<AppState> {
    let codec = PasetoCodec::from_base64_seed(args.session_secret.expose_secret())
        .context("invalid --session-secret, expected a base64 encoded 32-byte seed")?;

    let issuer = RemoteIssuer::new(
        HttpClient::new(args.identity_api_url.clone())
            .context("Failed to build credential issuer client")?,
    );
    let reviews = ReviewApi::new(
        HttpClient::new(args.review_api_url.clone())
            .context("Failed to build review service client")?,
    );
    let config = AuthConfig::new(args.public_url.clone())
        .with_session_ttl_seconds(args.session_ttl_seconds);

    Ok(AppState::new(
        Arc::new(codec),
        Arc::new(issuer),
        reviews,
        config,
    ))
}

fn log_startup_args(args: &Args, state: &AppState) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("public_url", args.public_url.clone()),
        (
            "session_cookie_secure",
            state.config().session_cookie_secure().to_string(),
        ),
        ("session_ttl_seconds", args.session_ttl_seconds.to_string()),
        ("review_api_url", args.review_api_url.clone()),
        ("identity_api_url", args.identity_api_url.clone()),
    ];
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "reviewdesk {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        message.push_str(&format!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
