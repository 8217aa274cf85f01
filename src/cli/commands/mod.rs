pub mod auth;
pub mod logging;
pub mod upstream;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const CMD_KEYGEN: &str = "keygen";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("reviewdesk")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_negates_reqs(true)
        .subcommand(
            Command::new(CMD_KEYGEN).about("Print a new base64 session secret and exit"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("REVIEWDESK_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = auth::with_args(command);
    let command = upstream::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=";

    fn required_args() -> Vec<&'static str> {
        vec![
            "reviewdesk",
            "--public-url",
            "https://reviewdesk.dev",
            "--session-secret",
            SECRET,
            "--review-api-url",
            "http://reviews.internal:9000",
            "--identity-api-url",
            "http://identity.internal:9001",
        ]
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "reviewdesk");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars_unset(
            [
                "REVIEWDESK_PORT",
                "REVIEWDESK_SESSION_TTL_SECONDS",
                "REVIEWDESK_LOG_LEVEL",
            ],
            || {
                let mut args = required_args();
                args.extend(["--port", "9090"]);
                let matches = new().get_matches_from(args);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
                assert_eq!(
                    matches.get_one::<String>(auth::ARG_PUBLIC_URL).cloned(),
                    Some("https://reviewdesk.dev".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(2_592_000)
                );
                assert_eq!(
                    matches
                        .get_one::<String>(upstream::ARG_REVIEW_API_URL)
                        .cloned(),
                    Some("http://reviews.internal:9000".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("REVIEWDESK_PUBLIC_URL", Some("https://reviewdesk.dev")),
                ("REVIEWDESK_SESSION_SECRET", Some(SECRET)),
                ("REVIEWDESK_SESSION_TTL_SECONDS", Some("3600")),
                (
                    "REVIEWDESK_REVIEW_API_URL",
                    Some("http://reviews.internal:9000"),
                ),
                (
                    "REVIEWDESK_IDENTITY_API_URL",
                    Some("http://identity.internal:9001"),
                ),
                ("REVIEWDESK_PORT", Some("443")),
                ("REVIEWDESK_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["reviewdesk"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<i64>(auth::ARG_SESSION_TTL_SECONDS)
                        .copied(),
                    Some(3600)
                );
                assert_eq!(
                    matches
                        .get_one::<String>(upstream::ARG_IDENTITY_API_URL)
                        .cloned(),
                    Some("http://identity.internal:9001".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("REVIEWDESK_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(required_args());
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("REVIEWDESK_LOG_LEVEL", None::<String>)], || {
                let mut args: Vec<String> =
                    required_args().into_iter().map(String::from).collect();
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_keygen_skips_required_args() {
        temp_env::with_vars_unset(
            [
                "REVIEWDESK_PUBLIC_URL",
                "REVIEWDESK_SESSION_SECRET",
                "REVIEWDESK_REVIEW_API_URL",
                "REVIEWDESK_IDENTITY_API_URL",
            ],
            || {
                let matches = new().try_get_matches_from(["reviewdesk", CMD_KEYGEN]);
                assert!(matches.is_ok_and(|m| m.subcommand_name() == Some(CMD_KEYGEN)));
            },
        );
    }

    #[test]
    fn test_missing_required_args_fail() {
        temp_env::with_vars_unset(
            [
                "REVIEWDESK_PUBLIC_URL",
                "REVIEWDESK_SESSION_SECRET",
                "REVIEWDESK_REVIEW_API_URL",
                "REVIEWDESK_IDENTITY_API_URL",
            ],
            || {
                assert!(new().try_get_matches_from(["reviewdesk"]).is_err());
            },
        );
    }
}
