use std::{collections::BTreeSet, io::Write};

use anyhow::Result;
use tracing::debug;

use crate::{
    browser::{Browser, Launcher},
    config::Settings,
    display::{ProgressLine, SEPARATOR, print_settings},
    prompt::{LineSource, select},
    query::{collect_pull_requests, expand_repositories},
    selection::{Token, Vocabulary, resolve},
    store::PrStore,
    types::{Forge, Interface},
};

/// Everything one invocation talks to besides the forge.
pub struct Session<'a, S, L, W> {
    pub lines: &'a mut S,
    pub browser: &'a mut Browser<L>,
    pub out: &'a mut W,
    pub progress: ProgressLine,
}

/// Runs the tool once: collect, summarize, then open what the user picks.
///
/// Returns the populated store.
pub async fn run<F, S, L, W>(
    mut settings: Settings,
    forge: &F,
    session: Session<'_, S, L, W>,
) -> Result<PrStore>
where
    F: Forge + Sync,
    S: LineSource,
    L: Launcher,
    W: Write,
{
    let Session {
        lines,
        browser,
        out,
        progress,
    } = session;

    expand_repositories(&mut settings, forge).await?;

    if settings.verbose {
        print_settings(out, &settings)?;
    }

    let store = collect_pull_requests(&settings, forge, out, &progress).await?;

    let summary = store.render_summary(&settings);
    if !summary.is_empty() {
        writeln!(out, "{summary}")?;
    }
    writeln!(out, "{SEPARATOR}")?;

    match settings.interface {
        Interface::Terminal => {
            let tokens = if settings.auto_open {
                writeln!(out, "Automatically opening links for all found PRs.")?;
                BTreeSet::from([Token::All])
            } else {
                let vocabulary = Vocabulary::new(&store, &settings.authors);
                select(&vocabulary, lines, out, &settings)?
            };

            let urls = resolve(&store, &tokens);
            debug!("Opening {} URLs", urls.len());
            for url in &urls {
                browser.open(url, out).await?;
            }

            if !settings.quiet {
                writeln!(out, "{SEPARATOR}")?;
                writeln!(out)?;
            }
        }
        Interface::None => {
            if !settings.quiet {
                writeln!(out, "No output to display.")?;
            }
        }
    }

    writeln!(out, "Done.")?;
    out.flush()?;
    Ok(store)
}
