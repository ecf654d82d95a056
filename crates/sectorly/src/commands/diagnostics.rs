//! Troubleshooting dump.

use tracing::warn;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Runs one update cycle, then prints the coordinator's redacted
/// diagnostics. A failed cycle still prints, with `last_error` set.
pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    if let Err(err) = ctx.coordinator.refresh().await {
        warn!(error = %err, "update cycle failed");
    }
    let diagnostics = ctx.coordinator.diagnostics();
    let out = match ctx.global.output {
        OutputFormat::Yaml => output::render_yaml(&diagnostics)?,
        OutputFormat::JsonCompact => output::render_json(&diagnostics, true)?,
        OutputFormat::Table | OutputFormat::Json | OutputFormat::Plain => {
            output::render_json(&diagnostics, false)?
        }
    };
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
