//! Map validated CLI matches to an action.

use crate::cli::{
    actions::{Action, server::Args},
    commands::{CMD_KEYGEN, auth, upstream},
};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if matches.subcommand_name() == Some(CMD_KEYGEN) {
        return Ok(Action::Keygen);
    }

    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let auth_opts = auth::Options::parse(matches)?;
    let upstream_opts = upstream::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        public_url: auth_opts.public_url,
        session_secret: auth_opts.session_secret,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        review_api_url: upstream_opts.review_api_url,
        identity_api_url: upstream_opts.identity_api_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    const SECRET: &str = "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=";

    fn args(public_url: &'static str) -> Vec<&'static str> {
        vec![
            "reviewdesk",
            "--public-url",
            public_url,
            "--session-secret",
            SECRET,
            "--review-api-url",
            "http://reviews.internal:9000",
            "--identity-api-url",
            "http://identity.internal:9001",
        ]
    }

    #[test]
    fn server_action_carries_all_options() -> Result<()> {
        temp_env::with_vars_unset(
            ["REVIEWDESK_PORT", "REVIEWDESK_SESSION_TTL_SECONDS"],
            || -> Result<()> {
                let matches = commands::new().try_get_matches_from(args("https://reviewdesk.dev"))?;
                let Action::Server(server) = handler(&matches)? else {
                    anyhow::bail!("expected server action");
                };
                assert_eq!(server.port, 8080);
                assert_eq!(server.public_url, "https://reviewdesk.dev");
                assert_eq!(server.session_secret.expose_secret(), SECRET);
                assert_eq!(server.session_ttl_seconds, 2_592_000);
                assert_eq!(server.review_api_url, "http://reviews.internal:9000");
                Ok(())
            },
        )
    }

    #[test]
    fn invalid_public_url_is_rejected() -> Result<()> {
        let matches = commands::new().try_get_matches_from(args("not a url"))?;
        assert!(handler(&matches).is_err());
        Ok(())
    }

    #[test]
    fn keygen_subcommand_dispatches() -> Result<()> {
        let matches = commands::new().try_get_matches_from(["reviewdesk", CMD_KEYGEN])?;
        assert!(matches!(handler(&matches)?, Action::Keygen));
        Ok(())
    }
}
