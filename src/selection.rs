//! The "which PRs to open" command language.
//!
//! A command is a whitespace-separated set of tokens. Each token is an
//! author, a `repo:number` key, `all` or `none`. A command is only accepted
//! when every token is known; it then expands to the union of the URLs each
//! token stands for.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use thiserror::Error;

use crate::store::PrStore;

pub const ALL: &str = "all";
pub const NONE: &str = "none";

/// One accepted word of a selection command.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    All,
    /// Selects nothing. It does not cancel other tokens in the same command.
    None,
    Author(String),
    Number(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No command specified.")]
    Empty,
    #[error("{}", describe_unknown(.0))]
    Unknown(Vec<String>),
}

fn describe_unknown(tokens: &[String]) -> String {
    match tokens {
        [single] => format!("Unknown command '{single}' specified."),
        many => format!("Specified unknown commands: {}.", many.join(", ")),
    }
}

/// The words a user may type at the prompt, derived from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    authors: Vec<String>,
    numbers: Vec<String>,
}

impl Vocabulary {
    /// Store authors that are also configured, plus every number key.
    pub fn new(store: &PrStore, configured_authors: &[String]) -> Self {
        let authors = store
            .authors()
            .into_iter()
            .filter(|author| configured_authors.contains(author))
            .collect();

        Self {
            authors,
            numbers: store.numbers(),
        }
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }

    pub fn misc(&self) -> [&'static str; 2] {
        [ALL, NONE]
    }

    /// Every valid word: literals first, then authors, then number keys.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.misc()
            .into_iter()
            .chain(self.authors.iter().map(String::as_str))
            .chain(self.numbers.iter().map(String::as_str))
    }

    pub fn classify(&self, word: &str) -> Option<Token> {
        match word {
            ALL => Some(Token::All),
            NONE => Some(Token::None),
            _ if self.authors.iter().any(|a| a == word) => Some(Token::Author(word.to_string())),
            _ if self.numbers.iter().any(|n| n == word) => Some(Token::Number(word.to_string())),
            _ => None,
        }
    }

    /// Splits `input` into a token set, rejecting it whole if any word is
    /// unknown.
    pub fn parse(&self, input: &str) -> Result<BTreeSet<Token>, SelectionError> {
        let words: BTreeSet<&str> = input.split_whitespace().collect();
        if words.is_empty() {
            return Err(SelectionError::Empty);
        }

        let mut tokens = BTreeSet::new();
        let mut unknown = Vec::new();
        for word in words {
            match self.classify(word) {
                Some(token) => {
                    tokens.insert(token);
                }
                None => unknown.push(word.to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(tokens)
        } else {
            Err(SelectionError::Unknown(unknown))
        }
    }

    /// Known words starting with `partial`, sorted.
    pub fn suggest(&self, partial: &str) -> Vec<&str> {
        suggest(partial, self.words())
    }
}

/// Prefix-matches `partial` against `words`. Pure; returns a sorted,
/// duplicate-free list.
pub fn suggest<'a>(partial: &str, words: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let matches: BTreeSet<&str> = words
        .into_iter()
        .filter(|word| word.starts_with(partial))
        .collect();
    matches.into_iter().collect()
}

/// Expands an accepted token set into the URLs to open.
///
/// URLs keep the order of first appearance while walking the tokens.
pub fn resolve(store: &PrStore, tokens: &BTreeSet<Token>) -> IndexSet<String> {
    let mut urls = IndexSet::new();
    for token in tokens {
        let contributed = match token {
            Token::All => store.all_urls(),
            Token::None => Vec::new(),
            Token::Author(author) => store.urls_by_author(author),
            Token::Number(key) => store.urls_by_number(key),
        };
        urls.extend(contributed);
    }
    urls
}

/// Parses and expands one raw command line in a single step.
pub fn resolve_command(
    store: &PrStore,
    vocabulary: &Vocabulary,
    input: &str,
) -> Result<IndexSet<String>, SelectionError> {
    let tokens = vocabulary.parse(input)?;
    Ok(resolve(store, &tokens))
}
