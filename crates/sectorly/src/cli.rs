//! Clap derive structures for the `sectorly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sectorly_core::ArmMode;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sectorly -- Sector Alarm panels from the command line
#[derive(Debug, Parser)]
#[command(
    name = "sectorly",
    version,
    about = "Monitor and control Sector Alarm panels from the command line",
    long_about = "Polls the Sector Alarm cloud API for panel status, sensors, \
        smart locks and lock events, and sends arm, lock and smart plug commands.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Panel profile to use
    #[arg(long, short = 'p', env = "SECTORLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SECTORLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Panel ID (overrides profile)
    #[arg(long, env = "SECTORLY_PANEL_ID", global = true)]
    pub panel_id: Option<String>,

    /// Account e-mail (overrides profile)
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "SECTORLY_API_URL", global = true, hide_env = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SECTORLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "SECTORLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SECTORLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show panel status and alarm state
    #[command(alias = "st")]
    Status,

    /// List devices and their sensor readings
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// Show recent lock events grouped by lock
    Events(EventsArgs),

    /// List panels visible to the account
    Panels,

    /// Poll the panel continuously and print each update
    Watch(WatchArgs),

    /// Arm the alarm system
    Arm(ArmArgs),

    /// Disarm the alarm system
    Disarm(CodeArgs),

    /// Lock a smart lock
    Lock(LockArgs),

    /// Unlock a smart lock
    Unlock(LockArgs),

    /// Switch a smart plug
    Plug(PlugArgs),

    /// Save the latest still image from a camera
    Camera(CameraArgs),

    /// Dump configuration, session and data for troubleshooting
    Diagnostics,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-command arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Only show events for this lock serial
    #[arg(long)]
    pub lock: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between updates (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CodeArgs {
    /// Panel user code (falls back to SECTORLY_CODE, keyring, config, then a prompt)
    #[arg(long, short = 'c')]
    pub code: Option<String>,
}

#[derive(Debug, Args)]
pub struct ArmArgs {
    /// Arming mode
    #[arg(value_enum, default_value = "total")]
    pub mode: ArmModeArg,

    #[command(flatten)]
    pub code: CodeArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArmModeArg {
    /// Arm every zone (away)
    Total,
    /// Arm the perimeter only (home)
    Partial,
}

impl From<ArmModeArg> for ArmMode {
    fn from(mode: ArmModeArg) -> Self {
        match mode {
            ArmModeArg::Total => ArmMode::Total,
            ArmModeArg::Partial => ArmMode::Partial,
        }
    }
}

#[derive(Debug, Args)]
pub struct LockArgs {
    /// Serial number of the lock
    pub serial: String,

    #[command(flatten)]
    pub code: CodeArgs,
}

#[derive(Debug, Args)]
pub struct PlugArgs {
    #[command(subcommand)]
    pub command: PlugCommand,
}

#[derive(Debug, Subcommand)]
pub enum PlugCommand {
    /// Turn a smart plug on
    On {
        /// Smart plug ID
        id: String,
    },
    /// Turn a smart plug off
    Off {
        /// Smart plug ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CameraArgs {
    /// Serial number of the camera
    pub serial: String,

    /// Output file (defaults to `<serial>.jpg`)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the account password in the system keyring
    SetPassword,

    /// Store the panel user code in the system keyring
    SetCode,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
