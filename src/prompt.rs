//! Reading a selection command from the user.

use std::{
    collections::BTreeSet,
    io::{self, BufRead, IsTerminal, Write},
};

use anyhow::{Context, Result};
use dialoguer::{BasicHistory, Completion, Input};
use tracing::warn;

use crate::{
    config::Settings,
    display::print_selection_help,
    selection::{Token, Vocabulary},
};

/// Where command lines come from.
pub trait LineSource {
    /// Reads one line. `None` means input is exhausted.
    fn read_line(&mut self, vocabulary: &Vocabulary) -> Result<Option<String>>;
}

/// Completes the last word of `line` against the vocabulary.
///
/// A unique match is completed in full and followed by a space; several
/// matches are extended to their longest common prefix.
pub fn complete_line(line: &str, vocabulary: &Vocabulary) -> Option<String> {
    let head_len = line.trim_end_matches(|c: char| !c.is_whitespace()).len();
    let (head, word) = line.split_at(head_len);
    if word.is_empty() {
        return None;
    }

    match vocabulary.suggest(word).as_slice() {
        [] => None,
        [only] => Some(format!("{head}{only} ")),
        [first, rest @ ..] => {
            let prefix = rest
                .iter()
                .fold(*first, |prefix, candidate| common_prefix(prefix, candidate));
            (prefix.len() > word.len()).then(|| format!("{head}{prefix}"))
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..len]
}

struct VocabularyCompletion<'a> {
    vocabulary: &'a Vocabulary,
}

impl Completion for VocabularyCompletion<'_> {
    fn get(&self, input: &str) -> Option<String> {
        complete_line(input, self.vocabulary)
    }
}

/// Reads from the terminal with history and tab completion, or plainly from
/// stdin when it is not a terminal.
pub struct TerminalLines {
    history: BasicHistory,
}

impl TerminalLines {
    pub fn new() -> Self {
        Self {
            history: BasicHistory::new().no_duplicates(true),
        }
    }
}

impl Default for TerminalLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TerminalLines {
    fn read_line(&mut self, vocabulary: &Vocabulary) -> Result<Option<String>> {
        if !io::stdin().is_terminal() {
            let mut line = String::new();
            let read = io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read from stdin")?;
            return Ok((read > 0).then_some(line));
        }

        let completion = VocabularyCompletion { vocabulary };
        let line = Input::<String>::new()
            .with_prompt("Open")
            .allow_empty(true)
            .history_with(&mut self.history)
            .completion_with(&completion)
            .interact_text()
            .context("Failed to read selection")?;
        Ok(Some(line))
    }
}

/// Prompts until the user enters a command made only of known words.
///
/// Running out of input selects nothing.
pub fn select<S, W>(
    vocabulary: &Vocabulary,
    lines: &mut S,
    out: &mut W,
    settings: &Settings,
) -> Result<BTreeSet<Token>>
where
    S: LineSource,
    W: Write,
{
    if !settings.quiet {
        print_selection_help(out, vocabulary, &settings.indent)?;
    }
    out.flush()?;

    loop {
        let Some(line) = lines.read_line(vocabulary)? else {
            warn!("Input closed before a selection was made; opening nothing");
            return Ok(BTreeSet::from([Token::None]));
        };

        match vocabulary.parse(&line) {
            Ok(tokens) => return Ok(tokens),
            Err(err) => {
                writeln!(out, "{err}")?;
                if !settings.quiet {
                    print_selection_help(out, vocabulary, &settings.indent)?;
                }
                out.flush()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        config::DEFAULT_INDENT,
        store::PrStore,
        types::{Credentials, Interface},
    };

    struct Scripted(VecDeque<&'static str>);

    impl LineSource for Scripted {
        fn read_line(&mut self, _vocabulary: &Vocabulary) -> Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }
    }

    fn settings(quiet: bool) -> Settings {
        Settings {
            org: "acme".to_string(),
            repos: vec!["repoA".to_string()],
            authors: vec!["alice".to_string(), "bob".to_string()],
            credentials: Credentials::Token("t".to_string()),
            interface: Interface::Terminal,
            auto_open: false,
            show_link: false,
            indent: DEFAULT_INDENT.to_string(),
            verbose: false,
            quiet,
        }
    }

    fn vocabulary() -> Vocabulary {
        let mut store = PrStore::new();
        store.add("alice", "repoA", "Fix bug", 12, "http://x/12");
        store.add("bob", "repoA", "Add feature", 13, "http://x/13");
        store.add("bob", "repoB", "Other", 7, "http://x/b7");
        Vocabulary::new(&store, &settings(false).authors)
    }

    #[test]
    fn test_complete_unique_word() {
        let vocabulary = vocabulary();
        assert_eq!(complete_line("al", &vocabulary), None);
        assert_eq!(complete_line("ali", &vocabulary), Some("alice ".to_string()));
        assert_eq!(complete_line("all b", &vocabulary), Some("all bob ".to_string()));
    }

    #[test]
    fn test_complete_common_prefix() {
        let vocabulary = vocabulary();
        assert_eq!(complete_line("r", &vocabulary), Some("repo".to_string()));
        assert_eq!(complete_line("repoA", &vocabulary), Some("repoA:1".to_string()));
        assert_eq!(complete_line("repo", &vocabulary), None);
    }

    #[test]
    fn test_complete_nothing_to_do() {
        let vocabulary = vocabulary();
        assert_eq!(complete_line("", &vocabulary), None);
        assert_eq!(complete_line("alice ", &vocabulary), None);
        assert_eq!(complete_line("zzz", &vocabulary), None);
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix("repoA:12", "repoA:13"), "repoA:1");
        assert_eq!(common_prefix("abc", "abcdef"), "abc");
        assert_eq!(common_prefix("abc", "xyz"), "");
    }

    #[test]
    fn test_select_accepts_first_valid_line() {
        let mut lines = Scripted(VecDeque::from(["alice repoA:13"]));
        let mut out = Vec::new();

        let tokens = select(&vocabulary(), &mut lines, &mut out, &settings(false)).unwrap();
        assert_eq!(
            tokens,
            BTreeSet::from([
                Token::Author("alice".to_string()),
                Token::Number("repoA:13".to_string())
            ])
        );

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("You can specify PRs to open by;\n"));
        assert!(text.contains("    Author: alice, bob\n"));
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let mut lines = Scripted(VecDeque::from(["", "bob extra", "nope never", "bob"]));
        let mut out = Vec::new();

        let tokens = select(&vocabulary(), &mut lines, &mut out, &settings(false)).unwrap();
        assert_eq!(tokens, BTreeSet::from([Token::Author("bob".to_string())]));
        assert!(lines.0.is_empty());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No command specified.\n"));
        assert!(text.contains("Unknown command 'extra' specified.\n"));
        assert!(text.contains("Specified unknown commands: never, nope.\n"));
        assert_eq!(text.matches("You can specify PRs to open by;").count(), 4);
    }

    #[test]
    fn test_select_quiet_only_reports_errors() {
        let mut lines = Scripted(VecDeque::from(["bogus", "none"]));
        let mut out = Vec::new();

        let tokens = select(&vocabulary(), &mut lines, &mut out, &settings(true)).unwrap();
        assert_eq!(tokens, BTreeSet::from([Token::None]));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Unknown command 'bogus' specified.\n"
        );
    }

    #[test]
    fn test_select_end_of_input_selects_nothing() {
        let mut lines = Scripted(VecDeque::from(["bogus"]));
        let mut out = Vec::new();

        let tokens = select(&vocabulary(), &mut lines, &mut out, &settings(true)).unwrap();
        assert_eq!(tokens, BTreeSet::from([Token::None]));
    }
}
