//! octo-pr: find open pull requests by a set of authors and open them.
//!
//! Lists the open pull requests of an organization's repositories, keeps the
//! ones written by configured authors, prints a per-author summary, and asks
//! which ones to open in the browser. The answer is a small command language
//! of author names, `repo:number` keys and the words `all` and `none`.

pub mod browser;
pub mod cli;
pub mod config;
pub mod display;
pub mod github;
pub mod prompt;
pub mod query;
pub mod run;
pub mod selection;
pub mod store;
pub mod types;

pub use browser::{Browser, Launcher, OpenOutcome, SystemLauncher};
pub use cli::{CliArgs, parse_args};
pub use config::{ConfigError, FileConfig, Settings, load_settings};
pub use display::ProgressLine;
pub use github::GitHub;
pub use prompt::{LineSource, TerminalLines};
pub use query::{collect_pull_requests, expand_repositories};
pub use run::{Session, run};
pub use selection::{SelectionError, Token, Vocabulary, resolve, resolve_command};
pub use store::PrStore;
pub use types::{Credentials, FetchError, FetchedPullRequest, Forge, Interface, PullRequest};
