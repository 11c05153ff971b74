use std::io::{self, IsTerminal, Write};

use crate::{config::Settings, selection::Vocabulary};

/// Printed between blocks of output.
pub const SEPARATOR: &str = "--------------------------";

/// A single status line that each update overwrites in place.
#[derive(Debug, Clone, Copy)]
pub struct ProgressLine {
    width: Option<usize>,
}

impl ProgressLine {
    /// Pads to `width` columns so a shorter message hides a longer one.
    pub const fn new(width: Option<usize>) -> Self {
        Self { width }
    }

    /// Sized to the terminal when stdout is one.
    pub fn for_stdout() -> Self {
        let width = io::stdout()
            .is_terminal()
            .then(terminal_size::terminal_size)
            .flatten()
            .map(|(w, _)| usize::from(w.0));
        Self::new(width)
    }

    pub fn update<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        let padding = self
            .width
            .map_or(0, |width| width.saturating_sub(message.chars().count()));
        write!(out, "\r{message}{}", " ".repeat(padding))?;
        out.flush()
    }

    /// Blanks the line and returns the cursor to its start.
    pub fn clear<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.update(out, "")?;
        write!(out, "\r")?;
        out.flush()
    }
}

fn bullets(items: &[String], indent: &str) -> String {
    items
        .iter()
        .map(|item| format!("{indent}* {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describes the resolved settings. Secrets are masked.
pub fn print_settings<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    let indent = settings.indent.as_str();

    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Using Auth: {}", settings.credentials.masked())?;
    if settings.auto_open {
        writeln!(out, "Automatically opening PRs made by;")?;
    } else {
        writeln!(out, "Finding open PRs made by;")?;
    }
    writeln!(out, "{}", bullets(&settings.authors, indent))?;
    writeln!(
        out,
        "In the organization '{}' to the following repos;",
        settings.org
    )?;
    writeln!(out, "{}", bullets(&settings.repos, indent))?;
    writeln!(out, "Formatting;")?;
    if settings.show_link {
        writeln!(out, "{indent}Printing links for each PR.")?;
    } else {
        writeln!(out, "{indent}Not printing links for each PR.")?;
    }
    writeln!(out, "{indent}And using an indent of '{indent}'.")?;
    writeln!(out, "{SEPARATOR}")
}

/// Lists what may be typed at the selection prompt.
pub fn print_selection_help<W: Write>(
    out: &mut W,
    vocabulary: &Vocabulary,
    indent: &str,
) -> io::Result<()> {
    writeln!(out, "You can specify PRs to open by;")?;
    writeln!(out, "{indent}Author: {}", vocabulary.authors().join(", "))?;
    writeln!(out, "{indent}PR #: {}", vocabulary.numbers().join(", "))?;
    writeln!(out, "{indent}Misc: {}", vocabulary.misc().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::PrStore,
        types::{Credentials, Interface},
    };

    fn settings() -> Settings {
        Settings {
            org: "acme".to_string(),
            repos: vec!["api".to_string(), "web".to_string()],
            authors: vec!["alice".to_string()],
            credentials: Credentials::Basic {
                username: "octocat".to_string(),
                password: "pw".to_string(),
            },
            interface: Interface::Terminal,
            auto_open: true,
            show_link: false,
            indent: "  ".to_string(),
            verbose: true,
            quiet: false,
        }
    }

    #[test]
    fn test_progress_line_pads_to_width() {
        let progress = ProgressLine::new(Some(10));
        let mut out = Vec::new();

        progress.update(&mut out, "abc").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\rabc       ");
    }

    #[test]
    fn test_progress_line_without_width() {
        let progress = ProgressLine::new(None);
        let mut out = Vec::new();

        progress.update(&mut out, "a message longer than nothing").unwrap();
        progress.clear(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\ra message longer than nothing\r\r"
        );
    }

    #[test]
    fn test_print_settings() {
        let mut out = Vec::new();
        print_settings(&mut out, &settings()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = [
            SEPARATOR,
            "Using Auth: username/password 'octocat'/'**'",
            "Automatically opening PRs made by;",
            "  * alice",
            "In the organization 'acme' to the following repos;",
            "  * api",
            "  * web",
            "Formatting;",
            "  Not printing links for each PR.",
            "  And using an indent of '  '.",
            SEPARATOR,
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
        assert!(!text.contains("pw'"));
    }

    #[test]
    fn test_print_selection_help() {
        let mut store = PrStore::new();
        store.add("alice", "api", "Fix", 1, "http://x/1");
        store.add("alice", "web", "Fix", 2, "http://x/2");
        let vocabulary = Vocabulary::new(&store, &["alice".to_string()]);

        let mut out = Vec::new();
        print_selection_help(&mut out, &vocabulary, "  ").unwrap();

        let expected = [
            "You can specify PRs to open by;",
            "  Author: alice",
            "  PR #: api:1, web:2",
            "  Misc: all, none",
            "",
        ]
        .join("\n");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
