use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    config::Settings,
    display::ProgressLine,
    store::{PrStore, normalize_author},
    types::{FetchError, Forge},
};

/// Replaces an `all` entry in the repository list with every repository the
/// organization has.
pub async fn expand_repositories<F>(settings: &mut Settings, forge: &F) -> Result<()>
where
    F: Forge + Sync,
{
    if !settings.wants_all_repos() {
        return Ok(());
    }

    let repos = match forge.org_repositories(&settings.org).await {
        Ok(repos) => repos,
        Err(err) if err.is_fatal() => return Err(invalid_credentials(settings)),
        Err(FetchError::RepoNotFound) => {
            anyhow::bail!("No organization called {} found", settings.org)
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to list repositories of {}", settings.org));
        }
    };
    debug!("Expanded 'all' to {} repositories", repos.len());
    settings.update_repos(repos);
    Ok(())
}

fn invalid_credentials(settings: &Settings) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid {} used. Exiting immediately since future requests cannot succeed",
        settings.credentials.kind()
    )
}

/// Fetches the open PRs of every configured repository, one at a time, and
/// keeps those by configured authors.
///
/// Missing repositories and unexpected API errors are reported on `out` and
/// skipped. Rejected credentials abort the whole collection.
pub async fn collect_pull_requests<F, W>(
    settings: &Settings,
    forge: &F,
    out: &mut W,
    progress: &ProgressLine,
) -> Result<PrStore>
where
    F: Forge + Sync,
    W: Write,
{
    let mut store = PrStore::new();
    let org = settings.org.as_str();
    let total = settings.repos.len();

    for (index, repo) in settings.repos.iter().enumerate() {
        progress.update(
            out,
            &format!("Getting PRs for '{org}/{repo}' ({}/{total})", index + 1),
        )?;

        let prs = match forge.open_pull_requests(org, repo).await {
            Ok(prs) => prs,
            Err(err) if err.is_fatal() => {
                progress.clear(out)?;
                return Err(invalid_credentials(settings));
            }
            Err(err) => {
                debug!("Skipping {}/{}: {}", org, repo, err);
                progress.clear(out)?;
                report_skipped(out, org, repo, &err)?;
                continue;
            }
        };

        for pr in prs {
            let author = normalize_author(&pr.author);
            if settings.authors.contains(&author) {
                store.add(&author, repo, pr.title, pr.number, pr.url);
            }
        }
    }

    progress.clear(out)?;
    debug!("Collected {} PRs from {} repositories", store.len(), total);
    Ok(store)
}

fn report_skipped<W: Write>(out: &mut W, org: &str, repo: &str, err: &FetchError) -> Result<()> {
    match err {
        FetchError::RepoNotFound => writeln!(out, "Error: No repo called {repo} found in {org}")?,
        other => writeln!(
            out,
            "Unknown error encountered {other}, while getting PRs for {repo} in {org}"
        )?,
    }
    Ok(())
}
