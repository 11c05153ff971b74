//! Opening pull request links in the user's browser.

use std::{
    collections::HashSet,
    ffi::OsString,
    io::{self, Write},
    process::Stdio,
    time::Duration,
};

use tokio::process::Command;
use tracing::debug;

/// Pause before each launch; the system opener drops tabs when invoked in
/// quick succession.
pub const OPEN_DELAY: Duration = Duration::from_millis(100);

/// The OS facility that actually shows a URL.
pub trait Launcher {
    fn launch(&self, url: &str) -> io::Result<()>;
}

/// Hands URLs to the platform opener (`open`, `xdg-open` or `cmd /C start`).
///
/// The opener is spawned and left running; on some desktops it stays in the
/// foreground for as long as the browser it started.
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    program: OsString,
    args: Vec<OsString>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_command("open", Vec::<&str>::new())
        } else if cfg!(target_os = "windows") {
            Self::with_command("cmd", ["/C", "start", ""])
        } else {
            Self::with_command("xdg-open", Vec::<&str>::new())
        }
    }

    /// Uses `program args... URL` as the opener.
    pub fn with_command<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, url: &str) -> io::Result<()> {
        // Detached from our stdio so the opener cannot eat prompt input.
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!("Spawned opener (pid {:?}) for {}", child.id(), url);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// Already opened earlier in this run.
    Filtered,
    Failed,
}

/// Opens each URL at most once for as long as the instance lives.
#[derive(Debug)]
pub struct Browser<L> {
    launcher: L,
    delay: Duration,
    dispatched: HashSet<String>,
}

impl<L: Launcher> Browser<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            delay: OPEN_DELAY,
            dispatched: HashSet::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Opens `url` unless it was already dispatched.
    ///
    /// Launch failures are reported on `out` and never returned as errors;
    /// only writing to `out` can fail.
    pub async fn open<W: Write>(&mut self, url: &str, out: &mut W) -> io::Result<OpenOutcome> {
        if !self.dispatched.insert(url.to_string()) {
            debug!("filtered {}", url);
            writeln!(out, "filtered {url}")?;
            return Ok(OpenOutcome::Filtered);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.launcher.launch(url) {
            Ok(()) => Ok(OpenOutcome::Opened),
            Err(err) => {
                debug!("Failed to open {}: {}", url, err);
                writeln!(out, "Attempted to open {url} and failed because {err}")?;
                Ok(OpenOutcome::Failed)
            }
        }
    }
}
