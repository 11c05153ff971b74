//! Aggregation of the pull requests found during a run.
//!
//! PRs are grouped by author and then by repository, both in the order they
//! were first seen, and indexed by their composite `repo:number` key.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::{config::Settings, types::PullRequest};

/// PRs of one author, keyed by repository name.
pub type ReposByName = IndexMap<String, Vec<PullRequest>>;

/// Builds the composite key that disambiguates numbers across repositories.
pub fn number_key(repo: &str, number: &str) -> String {
    format!("{repo}:{number}")
}

/// Authors are compared case-insensitively and without surrounding space.
pub fn normalize_author(author: &str) -> String {
    author.trim().to_lowercase()
}

#[derive(Debug, Default)]
pub struct PrStore {
    by_author_repo: IndexMap<String, ReposByName>,
    by_number: BTreeMap<String, String>,
    added: usize,
}

impl PrStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one pull request. Never fails.
    ///
    /// Re-adding an existing `repo:number` key replaces the indexed URL but
    /// still appends to the author's list.
    pub fn add(
        &mut self,
        author: &str,
        repo: &str,
        title: impl Into<String>,
        number: impl ToString,
        url: impl Into<String>,
    ) {
        let number = number.to_string();
        let url = url.into();

        self.by_number.insert(number_key(repo, &number), url.clone());
        self.by_author_repo
            .entry(normalize_author(author))
            .or_default()
            .entry(repo.to_string())
            .or_default()
            .push(PullRequest {
                title: title.into(),
                number,
                url,
            });
        self.added += 1;
    }

    /// Number of `add` calls so far.
    pub fn len(&self) -> usize {
        self.added
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0
    }

    /// Authors with at least one PR, ascending.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = self.by_author_repo.keys().cloned().collect();
        authors.sort();
        authors
    }

    /// Every composite `repo:number` key, ascending.
    pub fn numbers(&self) -> Vec<String> {
        self.by_number.keys().cloned().collect()
    }

    pub fn contains_author(&self, author: &str) -> bool {
        self.by_author_repo.contains_key(&normalize_author(author))
    }

    /// URLs of every PR by `author`, repository by repository. Unknown
    /// authors yield nothing.
    pub fn urls_by_author(&self, author: &str) -> Vec<String> {
        self.by_author_repo
            .get(&normalize_author(author))
            .map(urls_of)
            .unwrap_or_default()
    }

    /// The URL indexed under a composite key, if any.
    pub fn urls_by_number(&self, key: &str) -> Vec<String> {
        self.by_number.get(key).cloned().into_iter().collect()
    }

    /// Every URL, author by author in first-seen order. Not deduplicated.
    pub fn all_urls(&self) -> Vec<String> {
        self.by_author_repo.values().flat_map(urls_of).collect()
    }

    /// Authors with their repositories, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReposByName)> {
        self.by_author_repo
            .iter()
            .map(|(author, repos)| (author.as_str(), repos))
    }

    /// Renders the per-author status report.
    ///
    /// Authors appear in the order they were first added, not sorted.
    pub fn render_summary(&self, settings: &Settings) -> String {
        let indent = settings.indent.as_str();
        let mut lines = Vec::new();

        for (author, repos) in self.iter() {
            lines.push(author.to_string());
            for (repo, prs) in repos {
                lines.push(format!(
                    "{indent}{} {} against {repo}",
                    prs.len(),
                    plural(prs.len(), "PR", "PRs")
                ));

                for pr in prs {
                    if !settings.quiet {
                        lines.push(format!("{}{}: {}", indent.repeat(2), pr.number, pr.title));
                        if settings.show_link {
                            lines.push(format!("{}{}", indent.repeat(3), pr.url));
                        }
                    } else if settings.show_link {
                        lines.push(format!("{}{}", indent.repeat(2), pr.url));
                    }
                }
            }
        }

        if !settings.quiet {
            let idle: Vec<&str> = settings
                .authors
                .iter()
                .filter(|author| !self.contains_author(author))
                .map(String::as_str)
                .collect();
            if !idle.is_empty() {
                lines.push(format!(
                    "NOTE: {} {} no open prs",
                    idle.join(", "),
                    plural(idle.len(), "has", "have")
                ));
            }
        }

        lines.join("\n")
    }
}

fn urls_of(repos: &ReposByName) -> Vec<String> {
    repos
        .values()
        .flat_map(|prs| prs.iter().map(|pr| pr.url.clone()))
        .collect()
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
