use anyhow::{Context, Result};
use async_trait::async_trait;
use http::StatusCode;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::types::{Credentials, FetchError, FetchedPullRequest, Forge};

/// Largest page GitHub serves; we never ask for a second one.
const PER_PAGE: u8 = 100;

/// Maps a GitHub error response onto the fetch error taxonomy.
pub fn classify_status(status: StatusCode, message: &str) -> FetchError {
    if status == StatusCode::UNAUTHORIZED || message == "Bad credentials" {
        FetchError::InvalidCredentials
    } else if status == StatusCode::NOT_FOUND || message == "Not Found" {
        FetchError::RepoNotFound
    } else {
        FetchError::Unknown(message.to_string())
    }
}

fn classify_error(error: octocrab::Error) -> FetchError {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            classify_status(source.status_code, &source.message)
        }
        other => FetchError::Unknown(other.to_string()),
    }
}

#[derive(Debug, Serialize)]
struct ListParams {
    state: &'static str,
    per_page: u8,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

/// The handful of pull request fields we read from the REST response.
#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    user: Option<ApiUser>,
    html_url: Url,
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
}

impl From<ApiPullRequest> for FetchedPullRequest {
    fn from(pr: ApiPullRequest) -> Self {
        Self {
            // Deleted accounts come back without a user.
            author: pr.user.map_or_else(|| "ghost".to_string(), |user| user.login),
            title: pr.title.unwrap_or_default(),
            number: pr.number,
            url: pr.html_url.to_string(),
        }
    }
}

/// [`Forge`] backed by the GitHub REST API.
pub struct GitHub {
    octocrab: Octocrab,
}

impl GitHub {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Creates an authenticated client for `credentials`.
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        let builder = Octocrab::builder();
        let builder = match credentials {
            Credentials::Token(token) => builder.personal_token(token.clone()),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username.clone(), password.clone())
            }
        };
        let octocrab = builder.build().context("Failed to create GitHub client")?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn open_pull_requests(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<FetchedPullRequest>, FetchError> {
        debug!("Fetching open PRs for {}/{}", org, repo);

        let params = ListParams {
            state: "open",
            per_page: PER_PAGE,
        };
        let prs: Vec<ApiPullRequest> = self
            .octocrab
            .get(format!("/repos/{org}/{repo}/pulls"), Some(&params))
            .await
            .map_err(classify_error)?;

        debug!("Fetched {} open PRs for {}/{}", prs.len(), org, repo);
        Ok(prs.into_iter().map(FetchedPullRequest::from).collect())
    }

    async fn org_repositories(&self, org: &str) -> Result<Vec<String>, FetchError> {
        debug!("Listing repositories of {}", org);

        let params = [("per_page", PER_PAGE)];
        let repos: Vec<ApiRepository> = self
            .octocrab
            .get(format!("/orgs/{org}/repos"), Some(&params))
            .await
            .map_err(classify_error)?;

        Ok(repos.into_iter().map(|repo| repo.name).collect())
    }
}
