use std::io;
use std::process::ExitCode;

use clap::Parser;
use timebandit::cli::{self, Cli, Exit};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too, on stdout.
            let exit = if e.use_stderr() { Exit::Usage } else { Exit::Success };
            let _ = e.print();
            return exit.into();
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    cli::run(&cli, &mut stdout.lock(), &mut stderr.lock()).into()
}
