//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sectorly_config::ConfigError;
use sectorly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Update / connection ──────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(sectorly::update_failed),
        help("Check your network connection, or rerun with -vv for request logs.")
    )]
    UpdateFailed { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(sectorly::api_error))]
    Api { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sectorly::auth_failed),
        help(
            "Verify the e-mail and password for profile '{profile}'.\n\
             Run: sectorly config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sectorly::no_credentials),
        help(
            "Configure credentials with: sectorly config init\n\
             Or set SECTORLY_EMAIL and SECTORLY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    #[error("No user code available")]
    #[diagnostic(
        code(sectorly::no_code),
        help("Pass --code, set SECTORLY_CODE, or run: sectorly config set-code")
    )]
    NoCode,

    // ── Actions ──────────────────────────────────────────────────────
    #[error("The panel rejected the request: {action}")]
    #[diagnostic(
        code(sectorly::rejected),
        help("Check the user code and that the device is online.")
    )]
    Rejected { action: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sectorly::not_found),
        help("Run: sectorly devices to see available devices")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sectorly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sectorly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sectorly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sectorly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No panel configured")]
    #[diagnostic(
        code(sectorly::no_config),
        help(
            "Create a config with: sectorly config init\n\
             Expected at: {path}\n\
             Or pass --panel-id with SECTORLY_EMAIL and SECTORLY_PASSWORD."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sectorly::config))]
    Config(ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(sectorly::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(sectorly::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(sectorly::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpdateFailed { .. } | Self::Api { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::NoCode => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError ─────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UpdateFailed { message } => match message.strip_prefix("Authentication failed: ") {
                Some(reason) => CliError::AuthFailed {
                    profile: "current".into(),
                    message: reason.into(),
                },
                None => CliError::UpdateFailed { message },
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::InvalidCode { expected } => CliError::Validation {
                field: "code".into(),
                reason: format!("expected {expected} digits"),
            },
            CoreError::ActionFailed { action } => CliError::Rejected { action },
            CoreError::DeviceNotFound { serial_no } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: serial_no,
            },
            CoreError::ImageUnavailable { serial_no } => CliError::NotFound {
                resource_type: "camera image".into(),
                identifier: serial_no,
            },
            CoreError::Api { message } => CliError::Api { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_exit_with_auth_code() {
        let err = CliError::from(CoreError::UpdateFailed {
            message: "Authentication failed: invalid credentials".into(),
        });
        assert!(matches!(&err, CliError::AuthFailed { message, .. } if message == "invalid credentials"));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn other_update_failures_are_connection_errors() {
        let err = CliError::from(CoreError::UpdateFailed {
            message: "Failed to update data: timed out".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
        assert_eq!(err.to_string(), "Failed to update data: timed out");
    }

    #[test]
    fn rejected_actions_and_bad_codes() {
        let rejected = CliError::from(CoreError::ActionFailed {
            action: "arm".into(),
        });
        assert_eq!(rejected.exit_code(), exit_code::REJECTED);

        let bad_code = CliError::from(CoreError::InvalidCode { expected: 6 });
        assert_eq!(bad_code.exit_code(), exit_code::USAGE);
    }
}
