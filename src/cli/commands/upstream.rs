//! External services: the review store and the credential issuer.

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use url::Url;

pub const ARG_REVIEW_API_URL: &str = "review-api-url";
pub const ARG_IDENTITY_API_URL: &str = "identity-api-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub review_api_url: String,
    pub identity_api_url: String,
}

impl Options {
    /// Parse upstream arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a URL is missing or malformed.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        Ok(Self {
            review_api_url: parse_url(matches, ARG_REVIEW_API_URL)?,
            identity_api_url: parse_url(matches, ARG_IDENTITY_API_URL)?,
        })
    }
}

fn parse_url(matches: &ArgMatches, id: &str) -> anyhow::Result<String> {
    let value = matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))?;
    Url::parse(&value).with_context(|| format!("invalid --{id}"))?;
    Ok(value)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_REVIEW_API_URL)
                .long(ARG_REVIEW_API_URL)
                .help("Base URL of the review service")
                .env("REVIEWDESK_REVIEW_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_API_URL)
                .long(ARG_IDENTITY_API_URL)
                .help("Base URL of the credential issuer (POST /authenticate)")
                .env("REVIEWDESK_IDENTITY_API_URL")
                .required(true),
        )
}
