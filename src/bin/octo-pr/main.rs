use std::io::{self, Write};

use octo_pr::{
    Browser, GitHub, ProgressLine, Session, SystemLauncher, TerminalLines, config::ambient_token,
    load_settings, parse_args, run,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Help and version requests exit 0, usage errors exit 2.
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(clap_err) => clap_err.exit(),
            Err(err) => return Err(err),
        },
    };

    let settings = load_settings(&cli, ambient_token)?;
    let mut stdout = io::stdout();
    if !settings.quiet {
        writeln!(stdout, "Using config file at '{}'", cli.config.display())?;
    }

    let forge = GitHub::connect(&settings.credentials)?;
    let mut lines = TerminalLines::new();
    let mut browser = Browser::new(SystemLauncher::new());

    run(
        settings,
        &forge,
        Session {
            lines: &mut lines,
            browser: &mut browser,
            out: &mut stdout,
            progress: ProgressLine::for_stdout(),
        },
    )
    .await?;

    Ok(())
}
