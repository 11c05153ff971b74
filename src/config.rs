//! Settings for one run: a YAML config file with command-line overrides.
//!
//! The file holds a single `github:` mapping:
//!
//! ```yaml
//! github:
//!   auth_token: ghp_xxx        # or username + password
//!   org: acme
//!   repos: [api, web]          # [all] lists every repository in the org
//!   authors: [alice, bob]
//!   show_link: true
//! ```
//!
//! Every value given on the command line wins over the file; anything left
//! unset falls back to a default.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cli::CliArgs,
    store::normalize_author,
    types::{Credentials, Interface},
};

pub const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' doesn't exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config file '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("missing required config param '{0}'")]
    Missing(&'static str),
    #[error("you must specify either a username/password combo or an auth token to use")]
    NoCredentials,
}

/// Contents of the YAML config file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GithubSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct GithubSection {
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_token: Option<String>,
    pub org: Option<String>,
    pub repos: Option<Vec<String>>,
    pub authors: Option<Vec<String>>,
    pub interface: Option<Interface>,
    pub auto_open: Option<bool>,
    pub show_link: Option<bool>,
    pub indent: Option<String>,
    pub verbose_mode: Option<bool>,
    pub quiet_mode: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub org: String,
    pub repos: Vec<String>,
    /// Lower-cased, trimmed, sorted and unique.
    pub authors: Vec<String>,
    pub credentials: Credentials,
    pub interface: Interface,
    pub auto_open: bool,
    pub show_link: bool,
    pub indent: String,
    pub verbose: bool,
    pub quiet: bool,
}

/// Resolves verbose and quiet mode once.
///
/// | verbose (cli or file) | quiet                         |
/// |-----------------------|-------------------------------|
/// | true                  | false                         |
/// | false                 | cli, else file, else false    |
pub fn resolve_verbosity(
    cli_verbose: bool,
    cli_quiet: bool,
    file_verbose: Option<bool>,
    file_quiet: Option<bool>,
) -> (bool, bool) {
    let verbose = cli_verbose || file_verbose.unwrap_or(false);
    let quiet = !verbose && (cli_quiet || file_quiet.unwrap_or(false));
    (verbose, quiet)
}

fn normalize_authors(authors: Vec<String>) -> Vec<String> {
    let mut authors: Vec<String> = authors
        .iter()
        .map(|author| normalize_author(author))
        .filter(|author| !author.is_empty())
        .collect();
    authors.sort();
    authors.dedup();
    authors
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    (!list.is_empty()).then_some(list)
}

impl Settings {
    /// Merges the command line over the file.
    ///
    /// `fallback_token` is consulted only when neither source names any
    /// credentials.
    pub fn resolve(
        cli: &CliArgs,
        file: FileConfig,
        fallback_token: impl FnOnce() -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let github = file.github;

        let org = cli
            .org
            .clone()
            .or(github.org)
            .filter(|org| !org.trim().is_empty())
            .ok_or(ConfigError::Missing("org"))?;

        let mut repos = non_empty(cli.repos.clone())
            .or(github.repos)
            .and_then(non_empty)
            .ok_or(ConfigError::Missing("repos"))?;
        repos.sort();

        let authors = non_empty(cli.authors.clone())
            .or(github.authors)
            .map(normalize_authors)
            .and_then(non_empty)
            .ok_or(ConfigError::Missing("authors"))?;

        let token = cli.auth.auth_token.clone().or(github.auth_token);
        let username = cli.auth.username.clone().or(github.username);
        let password = cli.auth.password.clone().or(github.password);
        let credentials = match (token, username, password) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(username), Some(password)) => Credentials::Basic { username, password },
            _ => fallback_token()
                .map(Credentials::Token)
                .ok_or(ConfigError::NoCredentials)?,
        };

        let (verbose, quiet) = resolve_verbosity(
            cli.output.verbose,
            cli.output.quiet,
            github.verbose_mode,
            github.quiet_mode,
        );

        Ok(Self {
            org,
            repos,
            authors,
            credentials,
            interface: cli.output.interface.or(github.interface).unwrap_or_default(),
            auto_open: cli.output.auto_open || github.auto_open.unwrap_or(false),
            show_link: cli.output.show_link || github.show_link.unwrap_or(false),
            indent: cli
                .output
                .indent
                .clone()
                .or(github.indent)
                .unwrap_or_else(|| DEFAULT_INDENT.to_string()),
            verbose,
            quiet,
        })
    }

    /// Whether the repository list asks for every repository in the org.
    pub fn wants_all_repos(&self) -> bool {
        self.repos.iter().any(|repo| repo == "all")
    }

    pub fn update_repos(&mut self, mut repos: Vec<String>) {
        repos.sort();
        self.repos = repos;
    }
}

/// Loads the file named on the command line and resolves the run's settings.
pub fn load_settings(
    cli: &CliArgs,
    fallback_token: impl FnOnce() -> Option<String>,
) -> Result<Settings, ConfigError> {
    let file = FileConfig::load(&cli.config)?;
    Settings::resolve(cli, file, fallback_token)
}

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// A token found outside the config file, for runs that configure no
/// credentials: `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub fn ambient_token() -> Option<String> {
    token_from_env(|var| std::env::var(var).ok()).or_else(token_from_gh)
}

fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| lookup(*var))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

fn token_from_gh() -> Option<String> {
    let output = match Command::new("gh").args(["auth", "token"]).output() {
        Ok(output) => output,
        Err(err) => {
            debug!("gh CLI unavailable: {}", err);
            return None;
        }
    };
    if !output.status.success() {
        debug!("gh auth token exited with {}", output.status);
        return None;
    }

    let token = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!token.is_empty()).then_some(token)
}
