//! Camera still images.

use std::path::PathBuf;

use crate::cli::CameraArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

pub async fn handle(ctx: &Context<'_>, args: CameraArgs) -> Result<(), CliError> {
    let image = ctx.coordinator.camera_image(&args.serial).await?;
    let path = args
        .file
        .unwrap_or_else(|| PathBuf::from(format!("{}.jpg", args.serial)));
    tokio::fs::write(&path, &image).await?;
    output::print_output(
        &format!("Saved {} bytes to {}", image.len(), path.display()),
        ctx.global.quiet,
    );
    Ok(())
}
