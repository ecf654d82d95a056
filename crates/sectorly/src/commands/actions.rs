//! Arm, disarm, lock, unlock, and smart plug switching.

use sectorly_core::ArmMode;

use crate::cli::{ArmArgs, CodeArgs, LockArgs, PlugArgs, PlugCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

fn user_code(ctx: &Context<'_>, args: &CodeArgs) -> Result<secrecy::SecretString, CliError> {
    config::resolve_code(args.code.as_deref(), &ctx.profile, &ctx.profile_name)
}

fn done(ctx: &Context<'_>, message: &str) {
    output::print_output(message, ctx.global.quiet);
}

pub async fn arm(ctx: &Context<'_>, args: ArmArgs) -> Result<(), CliError> {
    let code = user_code(ctx, &args.code)?;
    let mode = ArmMode::from(args.mode);
    ctx.coordinator.arm(mode, &code).await?;
    done(ctx, &format!("Panel armed ({mode})"));
    Ok(())
}

pub async fn disarm(ctx: &Context<'_>, args: CodeArgs) -> Result<(), CliError> {
    let code = user_code(ctx, &args)?;
    ctx.coordinator.disarm(&code).await?;
    done(ctx, "Panel disarmed");
    Ok(())
}

pub async fn lock(ctx: &Context<'_>, args: LockArgs) -> Result<(), CliError> {
    let code = user_code(ctx, &args.code)?;
    ctx.coordinator.lock(&args.serial, &code).await?;
    done(ctx, &format!("Locked {}", args.serial));
    Ok(())
}

pub async fn unlock(ctx: &Context<'_>, args: LockArgs) -> Result<(), CliError> {
    if !util::confirm(
        &format!("Unlock door {}?", args.serial),
        ctx.global.yes,
        "unlock",
    )? {
        return Ok(());
    }
    let code = user_code(ctx, &args.code)?;
    ctx.coordinator.unlock(&args.serial, &code).await?;
    done(ctx, &format!("Unlocked {}", args.serial));
    Ok(())
}

pub async fn plug(ctx: &Context<'_>, args: PlugArgs) -> Result<(), CliError> {
    let (id, on) = match args.command {
        PlugCommand::On { id } => (id, true),
        PlugCommand::Off { id } => (id, false),
    };
    ctx.coordinator.set_smartplug(&id, on).await?;
    let state = if on { "on" } else { "off" };
    done(ctx, &format!("Smart plug {id} turned {state}"));
    Ok(())
}
