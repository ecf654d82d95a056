//! Continuous polling until Ctrl-C.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sectorly_core::Snapshot;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Context;

fn summary_line(snapshot: &Snapshot, color: bool) -> String {
    let locked = snapshot.locks().filter(|d| d.is_locked()).count();
    format!(
        "{}  alarm={}  devices={}  locked={}/{}",
        snapshot.refreshed_at.format("%H:%M:%S"),
        output::alarm_label(snapshot.panel_status.alarm_state(), color),
        snapshot.devices.len(),
        locked,
        snapshot.locks().count(),
    )
}

fn render_update(ctx: &Context<'_>, snapshot: &Snapshot) -> Result<String, CliError> {
    match ctx.global.output {
        OutputFormat::Table | OutputFormat::Plain => Ok(summary_line(
            snapshot,
            output::should_color(&ctx.global.color),
        )),
        // One document per update keeps the stream line-oriented.
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json(snapshot, true),
        OutputFormat::Yaml => Ok(format!("---\n{}", output::render_yaml(snapshot)?)),
    }
}

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let coordinator = ctx.coordinator;
    let mut updates = coordinator.subscribe();
    let cancel = CancellationToken::new();
    let handle = coordinator.spawn(cancel.clone());

    info!(
        interval_secs = coordinator.config().update_interval.as_secs(),
        "watching panel, press Ctrl-C to stop"
    );

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot: Option<Arc<Snapshot>> = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    match render_update(ctx, &snapshot) {
                        Ok(out) => output::print_output(&out, ctx.global.quiet),
                        Err(err) => break Err(err),
                    }
                }
            }
        }
    };

    cancel.cancel();
    if let Err(err) = handle.await {
        warn!(error = %err, "poll task ended abnormally");
    }
    result
}
