//! Command-line front end: `timebandit [-n N] [-r N] [-s S] [-p] [-v] [-u U] [--] [statement]`.
//!
//! The statement is a shell script, one argument per line, run through the
//! platform shell once per loop. Setup lines (`-s`) form a second script run
//! once before every trial and not timed. With no statement the target does
//! nothing, which measures the baseline overhead of the loop itself.
//!
//! If `-n` is not given (or is 0), a loop count is chosen by trying 1, 2, 5,
//! 10, 20, 50, ... until a trial takes at least 0.2 seconds.
//!
//! Exit codes: 0 on success, 1 when the timed code fails, 2 on usage errors.

use std::io::{self, Write};
use std::process::{Command, ExitCode, ExitStatus, Stdio};

use clap::{ArgAction, Parser};
use colored::Colorize;
use thiserror::Error;

use crate::config::{clamp_repeat, Config};
use crate::constants::DEFAULT_PRECISION;
use crate::measurement::{Clock, ClockFn, ClockKind, Timer};
use crate::output::json::to_json_pretty;
use crate::output::terminal::{
    format_failure, format_raw, format_summary, format_trial, unreliable_warning, TimeUnit,
};
use crate::result::Measurement;

/// Command-line arguments.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "timebandit",
    version,
    about = "Measure how long a shell statement takes: best of several trials"
)]
pub struct Cli {
    /// How many times to execute the statement per trial (default: choose automatically)
    #[arg(short = 'n', long, value_name = "N")]
    pub number: Option<usize>,

    /// Statement executed once before each trial, not timed (repeatable, one line each)
    #[arg(short = 's', long = "setup", value_name = "S")]
    pub setup: Vec<String>,

    /// How many trials to run (default: 5; values below 1 mean 1)
    #[arg(short = 'r', long, value_name = "N", allow_negative_numbers = true)]
    pub repeat: Option<i64>,

    /// Use process CPU time instead of the wall clock
    #[arg(short = 'p', long)]
    pub process: bool,

    /// Accepted for compatibility; the wall clock is already the default.
    #[arg(short = 't', long = "time", hide = true)]
    pub time: bool,

    /// Accepted for compatibility; the wall clock is already the default.
    #[arg(short = 'c', long = "clock", hide = true)]
    pub clock: bool,

    /// Print raw timing results; repeat for more digits of precision
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Unit for printed times
    #[arg(short = 'u', long, value_enum, value_name = "UNIT")]
    pub unit: Option<TimeUnit>,

    /// Print the measurement as JSON instead of the summary line
    #[arg(long)]
    pub json: bool,

    /// Statement to time, one argument per line (default: do nothing).
    /// Put `--` first if it starts with `-`.
    #[arg(trailing_var_arg = true, value_name = "STATEMENT")]
    pub statement: Vec<String>,
}

impl Cli {
    /// Configuration from the environment, overridden by these arguments.
    pub fn config(&self) -> Config {
        self.config_from(Config::from_env())
    }

    /// `base` overridden by these arguments.
    pub fn config_from(&self, mut base: Config) -> Config {
        if let Some(number) = self.number {
            base.number = (number > 0).then_some(number);
        }
        if let Some(repeat) = self.repeat {
            base.repeat = clamp_repeat(repeat);
        }
        if self.process {
            base.clock = ClockKind::Process;
        }
        base
    }

    /// Significant digits for printed times: 3, plus one per extra `-v`.
    pub fn precision(&self) -> usize {
        DEFAULT_PRECISION + usize::from(self.verbose.saturating_sub(1))
    }
}

/// Process outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Measurement printed.
    Success,
    /// The timed statement or setup failed.
    Failure,
    /// Bad arguments.
    Usage,
}

impl Exit {
    /// Numeric process exit code.
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Failure => 1,
            Exit::Usage => 2,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Failure of a shell statement.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The shell could not be started.
    #[error("failed to run `{script}`")]
    Spawn {
        /// Script text.
        script: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The script ran and reported failure.
    #[error("`{script}` exited with {status}")]
    Failed {
        /// Script text.
        script: String,
        /// Exit status reported by the shell.
        status: ExitStatus,
    },
}

/// A multi-line statement executed through the platform shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    text: String,
}

impl Script {
    /// Join `lines` with newlines; `None` if there is nothing to run.
    pub fn from_lines(lines: &[String]) -> Option<Self> {
        let text = lines.join("\n");
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    /// The script text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Run the script to completion. stdout is discarded, stderr is inherited.
    pub fn run(&self) -> Result<(), CommandError> {
        let status = shell(&self.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| CommandError::Spawn {
                script: self.text.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                script: self.text.clone(),
                status,
            })
        }
    }
}

#[cfg(unix)]
fn shell(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

#[cfg(not(unix))]
fn shell(script: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(script);
    cmd
}

fn run_script(script: Option<&Script>) -> Result<(), CommandError> {
    match script {
        Some(script) => script.run(),
        None => Ok(()),
    }
}

/// Run the measurement described by `cli`, writing the report to `out` and
/// diagnostics to `err`.
pub fn run(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> Exit {
    run_with(cli, &cli.config(), |clock| clock, out, err)
}

/// Like [`run`], with an explicit configuration and a hook that receives the
/// configured clock and returns the clock actually used.
pub fn run_with<C, W>(
    cli: &Cli,
    config: &Config,
    wrap_clock: W,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Exit
where
    W: FnOnce(ClockFn) -> C,
    C: Clock,
{
    match measure_and_report(cli, config, wrap_clock, out, err) {
        Ok(exit) => exit,
        Err(e) => {
            let _ = write!(err, "{}", format_failure(&e));
            Exit::Failure
        }
    }
}

fn measure_and_report<C, W>(
    cli: &Cli,
    config: &Config,
    wrap_clock: W,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<Exit>
where
    W: FnOnce(ClockFn) -> C,
    C: Clock,
{
    let precision = cli.precision();
    let verbose = cli.verbose > 0 && !cli.json;
    let target = Script::from_lines(&cli.statement);
    let setup = Script::from_lines(&cli.setup);

    tracing::debug!(
        statement = ?target.as_ref().map(Script::text),
        setup = ?setup.as_ref().map(Script::text),
        ?config,
        "starting measurement"
    );

    let mut timer = Timer::try_new(move || run_script(target.as_ref()))
        .with_setup(move || run_script(setup.as_ref()))
        .with_clock(wrap_clock(config.clock.as_fn()))
        .threshold(config.threshold);

    let (number, autoranged) = match config.number {
        Some(number) => (number, false),
        None => {
            let mut write_error = None;
            let found = timer.autorange_with(|number, secs| {
                if verbose && write_error.is_none() {
                    if let Err(e) = writeln!(out, "{}", format_trial(number, secs, precision)) {
                        write_error = Some(e);
                    }
                }
            });
            if let Some(e) = write_error {
                return Err(e);
            }
            match found {
                Ok((number, _)) => (number, true),
                Err(e) => {
                    write!(err, "{}", format_failure(&e))?;
                    return Ok(Exit::Failure);
                }
            }
        }
    };
    if autoranged && verbose {
        writeln!(out)?;
    }

    let raw_timings = match timer.repeat(config.repeat, number) {
        Ok(raw) => raw,
        Err(e) => {
            write!(err, "{}", format_failure(&e))?;
            return Ok(Exit::Failure);
        }
    };
    let measurement = Measurement::new(number, raw_timings, config.clock, autoranged);

    if verbose {
        writeln!(out, "{}", format_raw(&measurement, cli.unit, precision))?;
        writeln!(out)?;
    }

    if cli.json {
        let json = to_json_pretty(&measurement).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
    } else {
        writeln!(out, "{}", format_summary(&measurement, cli.unit, precision))?;
    }

    if let Some(warning) = unreliable_warning(&measurement, cli.unit, precision) {
        writeln!(err, "{} {}", "warning:".yellow().bold(), warning)?;
    }

    Ok(Exit::Success)
}
