//! Command-line interface

pub mod commands;
pub mod output;

use crate::core::{self, ConfigError, Configuration, DEFAULT_CONFIG_PATH};
use crate::logging::{self, DEFAULT_LOG_LEVEL};
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::ValidateCommand;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info_span, warn};
use tracing_subscriber::fmt::MakeWriter;

/// Process exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Process exit code for any load, validation, or command failure
pub const EXIT_FAILURE: i32 = 1;

/// Agent orchestration driven by orchestrator.yaml
#[derive(Debug, Parser, Clone)]
#[command(name = "conductor")]
#[command(version)]
#[command(about = "Validate, build, and run agent orchestration pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the orchestrator configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log level: debug, info, warn, error
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Check the configuration and report every problem found
    Validate(ValidateCommand),

    /// Build the agent container image
    Build,

    /// Run the pipeline
    Run,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Validate(_) => "validate",
            Command::Build => "build",
            Command::Run => "run",
        }
    }
}

impl Cli {
    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Parse `args` (including the program name) and execute the command.
///
/// User-facing output goes to `stdout`/`stderr`; log events go to
/// `log_writer` through a dispatcher scoped to this call. Returns the
/// process exit code.
pub fn run<I, T, W>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write, log_writer: W) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // If the stream is gone there is nowhere left to report to.
            let _ = if err.use_stderr() {
                write!(stderr, "{}", err)
            } else {
                write!(stdout, "{}", err)
            };
            return err.exit_code();
        }
    };

    let dispatch = logging::init_logging(&cli.log_level, log_writer);
    tracing::dispatcher::with_default(&dispatch, || {
        execute(&cli, stdout, stderr).unwrap_or_else(|err| {
            error!(error = %err, "failed to write command output");
            EXIT_FAILURE
        })
    })
}

/// Load and validate the configuration, then dispatch the command
pub fn execute(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    let span = info_span!("command", command = cli.command.name());
    let _entered = span.enter();

    let config = match load_checked(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            output::write_config_error(stderr, &err)?;
            return Ok(EXIT_FAILURE);
        }
    };

    for name in config.duplicate_step_names() {
        warn!(step = %name, "pipeline declares step name more than once");
    }

    match &cli.command {
        Command::Validate(cmd) => commands::validate(cmd, &cli.config, &config, stdout),
        Command::Build | Command::Run => commands::not_implemented(cli.command.name(), stderr),
    }
}

fn load_checked(path: &Path) -> Result<Configuration, ConfigError> {
    let config = match core::load(path) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "failed to load config");
            return Err(err);
        }
    };

    if let Err(err) = core::validate(&config) {
        // The listing itself goes to stderr; the event only carries the count.
        if let ConfigError::Invalid(violations) = &err {
            error!(problems = violations.len(), "config validation failed");
        }
        return Err(err);
    }

    Ok(config)
}
