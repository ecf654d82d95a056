//! Lock event log.

use serde::Serialize;
use tabled::Tabled;

use sectorly_core::GroupedEvents;

use crate::cli::EventsArgs;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Clone, Serialize, Tabled)]
struct EventRow {
    #[tabled(rename = "Lock")]
    lock: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Channel")]
    channel: String,
}

fn flatten(events: &GroupedEvents, only: Option<&str>) -> Vec<EventRow> {
    events
        .iter()
        .filter(|(serial, _)| only.is_none_or(|s| s == serial.as_str()))
        .flat_map(|(serial, by_type)| {
            by_type.iter().flat_map(move |(event, records)| {
                records.iter().map(move |r| EventRow {
                    lock: serial.clone(),
                    event: event.clone(),
                    time: r.time.clone(),
                    user: r.user.clone(),
                    channel: r.channel.clone(),
                })
            })
        })
        .collect()
}

pub async fn handle(ctx: &Context<'_>, args: EventsArgs) -> Result<(), CliError> {
    util::fresh_snapshot(ctx).await?;
    let events = ctx.coordinator.process_events();
    let rows = flatten(&events, args.lock.as_deref());
    let out = output::render_list(
        &ctx.global.output,
        &rows,
        EventRow::clone,
        |r| format!("{} {} {}", r.time, r.lock, r.event),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
