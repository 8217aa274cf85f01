//! Session token and cookie settings.

use anyhow::{Context, bail};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

/// One year.
pub const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Options {
    pub public_url: String,
    pub session_secret: SecretString,
    pub session_ttl_seconds: i64,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if an argument is missing or invalid.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let public_url = matches
            .get_one::<String>(ARG_PUBLIC_URL)
            .cloned()
            .context("missing required argument: --public-url")?;
        Url::parse(&public_url).with_context(|| format!("invalid --{ARG_PUBLIC_URL}"))?;

        let session_secret = match matches.get_one::<String>(ARG_SESSION_SECRET) {
            Some(value) if !value.trim().is_empty() => SecretString::from(value.clone()),
            _ => bail!("missing required argument: --{ARG_SESSION_SECRET}"),
        };

        let session_ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(crate::api::state::DEFAULT_SESSION_TTL_SECONDS);
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&session_ttl_seconds) {
            bail!("--{ARG_SESSION_TTL_SECONDS} must be between 1 and {MAX_SESSION_TTL_SECONDS}");
        }

        Ok(Self {
            public_url,
            session_secret,
            session_ttl_seconds,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public base URL of the site, https enables Secure cookies")
                .env("REVIEWDESK_PUBLIC_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Base64 encoded 32-byte Ed25519 seed used to sign session tokens")
                .long_help(
                    "Base64 encoded 32-byte Ed25519 seed used to sign session tokens.\n\nGenerate one with `reviewdesk keygen`. Rotating it signs everyone out.",
                )
                .env("REVIEWDESK_SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session token TTL in seconds, refreshed on every session check")
                .env("REVIEWDESK_SESSION_TTL_SECONDS")
                .default_value("2592000")
                .value_parser(clap::value_parser!(i64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn matches_with_ttl(ttl: &str) -> anyhow::Result<ArgMatches> {
        temp_env::with_vars_unset(["REVIEWDESK_SESSION_TTL_SECONDS"], || {
            // `=` keeps negative values from being read as flags.
            let ttl_arg = format!("--{ARG_SESSION_TTL_SECONDS}={ttl}");
            Ok(commands::new().try_get_matches_from([
                "reviewdesk",
                "--public-url",
                "https://reviewdesk.dev",
                "--session-secret",
                "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=",
                "--review-api-url",
                "http://reviews.internal:9000",
                "--identity-api-url",
                "http://identity.internal:9001",
                ttl_arg.as_str(),
            ])?)
        })
    }

    #[test]
    fn ttl_within_bounds_is_accepted() -> anyhow::Result<()> {
        let options = Options::parse(&matches_with_ttl("3600")?)?;
        assert_eq!(options.session_ttl_seconds, 3600);

        let options = Options::parse(&matches_with_ttl(&MAX_SESSION_TTL_SECONDS.to_string())?)?;
        assert_eq!(options.session_ttl_seconds, MAX_SESSION_TTL_SECONDS);
        Ok(())
    }

    #[test]
    fn ttl_out_of_bounds_is_rejected() -> anyhow::Result<()> {
        for ttl in ["0", "-5", "999999999999"] {
            assert!(Options::parse(&matches_with_ttl(ttl)?).is_err(), "{ttl}");
        }
        Ok(())
    }
}
