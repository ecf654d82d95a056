//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod actions;
pub mod camera;
pub mod config_cmd;
pub mod diagnostics;
pub mod events;
pub mod panels;
pub mod status;
pub mod util;
pub mod watch;

use sectorly_config::Profile;
use sectorly_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a panel-bound handler needs.
pub struct Context<'a> {
    pub coordinator: &'a Coordinator,
    pub global: &'a GlobalOpts,
    pub profile_name: String,
    pub profile: Profile,
}

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle_status(ctx).await,
        Command::Devices => status::handle_devices(ctx).await,
        Command::Events(args) => events::handle(ctx, args).await,
        Command::Panels => panels::handle(ctx).await,
        Command::Watch(_) => watch::handle(ctx).await,
        Command::Arm(args) => actions::arm(ctx, args).await,
        Command::Disarm(args) => actions::disarm(ctx, args).await,
        Command::Lock(args) => actions::lock(ctx, args).await,
        Command::Unlock(args) => actions::unlock(ctx, args).await,
        Command::Plug(args) => actions::plug(ctx, args).await,
        Command::Camera(args) => camera::handle(ctx, args).await,
        Command::Diagnostics => diagnostics::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
