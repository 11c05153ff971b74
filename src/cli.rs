use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};

use crate::types::Interface;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Username to authenticate with
    #[arg(short = 'u', long, help_heading = "Authentication", value_name = "USERNAME")]
    pub username: Option<String>,

    /// Password to authenticate with
    #[arg(short = 'p', long, help_heading = "Authentication", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Auth token to authenticate with
    #[arg(
        short = 't',
        long = "auth-token",
        help_heading = "Authentication",
        value_name = "TOKEN"
    )]
    pub auth_token: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// No output outside of prompts and fatal errors
    #[arg(short = 'q', long, help_heading = "Output")]
    pub quiet: bool,

    /// Show all configured options on launch (also disables quiet mode)
    #[arg(short = 'v', long, help_heading = "Output")]
    pub verbose: bool,

    /// Open every PR found in the default browser without prompting
    #[arg(short = 'b', long = "auto-open", help_heading = "Output")]
    pub auto_open: bool,

    /// Print each PR's link in the summary
    #[arg(short = 'l', long = "show-link", help_heading = "Output")]
    pub show_link: bool,

    /// String used to indent summary lines
    #[arg(short = 'i', long, help_heading = "Output", value_name = "INDENT")]
    pub indent: Option<String>,

    /// What to do once the summary is printed
    #[arg(long, value_enum, help_heading = "Output")]
    pub interface: Option<Interface>,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "octo-pr",
    about = "Find open PRs by a set of authors across an organization's repositories, then pick which ones to open in the browser"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
pub struct CliArgs {
    /// The YAML config file to load
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: PathBuf,

    /// Organization to search in
    #[arg(short = 'o', long, value_name = "ORG")]
    pub org: Option<String>,

    /// Repositories to search ('all' lists every repository in the organization)
    #[arg(short = 'r', long, value_name = "REPO", value_delimiter = ',')]
    pub repos: Vec<String>,

    /// Authors to search for
    #[arg(short = 'a', long, value_name = "AUTHOR", value_delimiter = ',')]
    pub authors: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub auth: AuthArgs,
}

/// Drops blank entries left by stray commas (`-r a,,b`).
fn without_blanks(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Parses command-line arguments.
///
/// Accepts `help` as a lone argument for people who type it out of habit.
pub fn parse_args<I, T>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let mut args: Vec<std::ffi::OsString> = args.into_iter().map(Into::into).collect();
    if args.len() == 2 && args[1] == "help" {
        args[1] = "--help".into();
    }

    let mut cli = CliArgs::try_parse_from(args)?;
    cli.repos = without_blanks(cli.repos);
    cli.authors = without_blanks(cli.authors);
    Ok(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = parse_args(["octo-pr", "-c", "prs.yml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("prs.yml"));
        assert!(cli.repos.is_empty());
        assert!(cli.authors.is_empty());
        assert!(!cli.output.quiet);
        assert!(cli.output.interface.is_none());
    }

    #[test]
    fn test_parse_lists_are_comma_separated() {
        let cli = parse_args([
            "octo-pr", "-c", "prs.yml", "-r", "api,web,,", "--authors", "Alice, bob",
        ])
        .unwrap();
        assert_eq!(cli.repos, vec!["api", "web"]);
        assert_eq!(cli.authors, vec!["Alice", "bob"]);
    }

    #[test]
    fn test_parse_flags() {
        let cli = parse_args([
            "octo-pr",
            "--config",
            "prs.yml",
            "-q",
            "-v",
            "-b",
            "-l",
            "-i",
            "\t",
            "--interface",
            "none",
            "-o",
            "acme",
            "-t",
            "secret",
        ])
        .unwrap();
        assert!(cli.output.quiet);
        assert!(cli.output.verbose);
        assert!(cli.output.auto_open);
        assert!(cli.output.show_link);
        assert_eq!(cli.output.indent.as_deref(), Some("\t"));
        assert_eq!(cli.output.interface, Some(Interface::None));
        assert_eq!(cli.org.as_deref(), Some("acme"));
        assert_eq!(cli.auth.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_config_is_required() {
        let err = parse_args(["octo-pr", "-o", "acme"]).unwrap_err();
        let clap_err = err.downcast_ref::<clap::Error>().unwrap();
        assert_eq!(
            clap_err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_help_word_shows_help() {
        let err = parse_args(["octo-pr", "help"]).unwrap_err();
        let clap_err = err.downcast_ref::<clap::Error>().unwrap();
        assert_eq!(clap_err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
