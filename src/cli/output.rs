//! CLI output formatting

use crate::core::{ConfigError, Configuration};
use console::Emoji;
use std::io::{self, Write};

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Short, indented overview of a loaded configuration
pub fn format_summary(config: &Configuration) -> String {
    let mut summary = format!(
        "  Project: {} ({})\n",
        style(&config.project.name).bold(),
        style(&config.project.repository).dim()
    );
    summary.push_str(&format!(
        "  Backend: {}\n",
        style(&config.credentials.backend).cyan()
    ));
    summary.push_str(&format!("  Agents: {}\n", style(config.agents.len()).cyan()));
    summary.push_str(&format!("  Steps: {}\n", style(config.pipeline.len()).cyan()));

    let duplicates = config.duplicate_step_names();
    if !duplicates.is_empty() {
        summary.push_str(&format!(
            "  {}Duplicate step names: {}\n",
            WARN,
            style(duplicates.join(", ")).yellow()
        ));
    }

    summary
}

/// Write a load or validation failure, one violation per line
pub fn write_config_error(out: &mut dyn Write, err: &ConfigError) -> io::Result<()> {
    match err {
        ConfigError::Invalid(violations) => {
            writeln!(
                out,
                "{}Validation failed ({} problems):",
                CROSS,
                violations.len()
            )?;
            for violation in violations {
                writeln!(out, "  {}", style(violation).red())?;
            }
        }
        ConfigError::Read { .. } | ConfigError::Parse { .. } => {
            writeln!(out, "{}Failed to load configuration:", CROSS)?;
            writeln!(out, "  {}", style(err).red())?;
        }
    }
    Ok(())
}
