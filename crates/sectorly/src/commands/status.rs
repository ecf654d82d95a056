//! Panel status and device listing.

use tabled::Tabled;

use sectorly_core::{Device, Snapshot};

use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Sensors")]
    sensors: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            serial: d.serial_no.clone(),
            name: d.display_name().to_owned(),
            model: d.model.clone(),
            sensors: util::sensor_summary(d),
        }
    }
}

/// Human-readable panel summary.
pub fn status_detail(snapshot: &Snapshot, color: bool) -> String {
    let panel = &snapshot.panel_status;
    let locks = snapshot.locks().count();
    let locked = snapshot.locks().filter(|d| d.is_locked()).count();
    [
        format!("Panel:     {}", panel.serial_no().unwrap_or("-")),
        format!(
            "Alarm:     {}",
            output::alarm_label(panel.alarm_state(), color)
        ),
        format!("Online:    {}", panel.is_online()),
        format!("Devices:   {}", snapshot.devices.len()),
        format!("Locks:     {locked}/{locks} locked"),
        format!(
            "Updated:   {}",
            snapshot.refreshed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ]
    .join("\n")
}

pub async fn handle_status(ctx: &Context<'_>) -> Result<(), CliError> {
    let snapshot = util::fresh_snapshot(ctx).await?;
    let color = output::should_color(&ctx.global.color);
    let out = output::render_single(
        &ctx.global.output,
        snapshot.as_ref(),
        |s| status_detail(s, color),
        |s| {
            s.panel_status
                .alarm_state()
                .map_or_else(|| "offline".into(), |a| a.to_string())
        },
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

pub async fn handle_devices(ctx: &Context<'_>) -> Result<(), CliError> {
    let snapshot = util::fresh_snapshot(ctx).await?;
    let devices: Vec<&Device> = snapshot.devices.values().collect();
    let out = output::render_list(
        &ctx.global.output,
        &devices,
        |d| DeviceRow::from(*d),
        |d| d.serial_no.clone(),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
