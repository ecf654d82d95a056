//! Panels visible to the account.

use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Clone, Serialize, Tabled)]
struct PanelRow {
    #[tabled(rename = "Panel ID")]
    panel_id: String,
    #[tabled(rename = "Name")]
    name: String,
}

pub async fn handle(ctx: &Context<'_>) -> Result<(), CliError> {
    let panels = ctx.coordinator.panels().await;
    let rows: Vec<PanelRow> = panels
        .into_iter()
        .map(|(panel_id, name)| PanelRow { panel_id, name })
        .collect();
    if rows.is_empty() {
        tracing::warn!("no panels returned for this account");
    }
    let out = output::render_list(&ctx.global.output, &rows, PanelRow::clone, |r| {
        r.panel_id.clone()
    })?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
