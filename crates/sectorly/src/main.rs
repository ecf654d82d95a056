mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sectorly_core::Coordinator;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a panel connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sectorly", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let (profile_name, profile, mut panel) = config::resolve_panel_config(&cli.global)?;
            if let Command::Watch(ref args) = cmd {
                if let Some(secs) = args.interval.filter(|s| *s > 0) {
                    panel.update_interval = std::time::Duration::from_secs(secs);
                }
            }
            let coordinator = Coordinator::new(panel)?;
            let ctx = Context {
                coordinator: &coordinator,
                global: &cli.global,
                profile_name,
                profile,
            };

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &ctx).await;
            coordinator.logout();
            result
        }
    }
}
