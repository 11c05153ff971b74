use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// A pull request as held by the store.
///
/// `number` is kept as text so it can be used directly inside composite
/// lookup keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,
    pub number: String,
    pub url: String,
}

/// An open pull request as reported by the forge, before author filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPullRequest {
    pub author: String,
    pub title: String,
    pub number: u64,
    pub url: String,
}

/// Classification of a failed forge request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The forge rejected our credentials; nothing later can succeed.
    #[error("bad credentials")]
    InvalidCredentials,
    #[error("not found")]
    RepoNotFound,
    #[error("{0}")]
    Unknown(String),
}

impl FetchError {
    /// Whether the error makes every later request pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::InvalidCredentials)
    }
}

/// Source of open pull requests for an organization's repositories.
#[async_trait]
pub trait Forge {
    /// Lists the open pull requests of `org/repo` with a single request.
    async fn open_pull_requests(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<FetchedPullRequest>, FetchError>;

    /// Lists the names of every repository in `org`.
    async fn org_repositories(&self, org: &str) -> Result<Vec<String>, FetchError>;
}

/// How the run authenticates against the forge.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl Credentials {
    /// Human wording used when the forge rejects the credentials.
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Token(_) => "auth token",
            Credentials::Basic { .. } => "username/password combo",
        }
    }

    /// The credentials with every secret character replaced by `*`.
    pub fn masked(&self) -> String {
        match self {
            Credentials::Token(token) => format!("Token '{}'", mask(token)),
            Credentials::Basic { username, password } => {
                format!("username/password '{}'/'{}'", username, mask(password))
            }
        }
    }
}

// Never print secrets, even from a stray `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// What to do with the collected pull requests once the summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// Prompt for PRs to open (or open everything with --auto-open)
    #[default]
    Terminal,
    /// Only print the summary
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_masked_hides_secrets() {
        let token = Credentials::Token("abcd".to_string());
        assert_eq!(token.masked(), "Token '****'");

        let basic = Credentials::Basic {
            username: "octocat".to_string(),
            password: "hunter2".to_string(),
        };
        assert_eq!(basic.masked(), "username/password 'octocat'/'*******'");
        assert!(!format!("{basic:?}").contains("hunter2"));
    }

    #[test]
    fn test_credentials_kind() {
        assert_eq!(Credentials::Token("t".into()).kind(), "auth token");
        let basic = Credentials::Basic {
            username: "u".into(),
            password: "p".into(),
        };
        assert_eq!(basic.kind(), "username/password combo");
    }

    #[test]
    fn test_only_invalid_credentials_is_fatal() {
        assert!(FetchError::InvalidCredentials.is_fatal());
        assert!(!FetchError::RepoNotFound.is_fatal());
        assert!(!FetchError::Unknown("boom".into()).is_fatal());
    }
}
