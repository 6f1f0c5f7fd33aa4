//! CLI command definitions

use super::output::{self, CHECK};
use super::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::core::Configuration;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Validate the orchestrator configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Also print the loaded configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Report a configuration that passed validation
pub fn validate(
    cmd: &ValidateCommand,
    path: &Path,
    config: &Configuration,
    stdout: &mut dyn Write,
) -> Result<i32> {
    info!(path = %path.display(), "configuration is valid");

    for (name, agent) in &config.agents {
        debug!(
            agent = %name,
            workspace = %agent.workspace,
            tools = ?agent.tools,
            placeholders = ?agent.prompt.placeholders(),
            "agent definition"
        );
    }

    writeln!(stdout, "{}configuration is valid", CHECK)?;
    write!(stdout, "{}", output::format_summary(config))?;

    if cmd.json {
        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration")?;
        writeln!(stdout, "\n{}", json)?;
    }

    Ok(EXIT_SUCCESS)
}

/// Placeholder for commands that load and validate but do nothing yet
pub fn not_implemented(command: &str, stderr: &mut dyn Write) -> Result<i32> {
    writeln!(stderr, "{}: not yet implemented", command)?;
    Ok(EXIT_FAILURE)
}
