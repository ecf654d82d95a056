// ── Core error types ──
//
// Errors surfaced by the coordinator. Callers never see HTTP details; the
// `From<sectorly_api::Error>` impl folds transport failures into these
// variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Update cycle ─────────────────────────────────────────────────
    /// One update cycle failed. The previous snapshot stays published.
    #[error("{message}")]
    UpdateFailed { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Actions ──────────────────────────────────────────────────────
    #[error("Invalid code length: expected {expected} digits")]
    InvalidCode { expected: usize },

    #[error("Action failed: {action}")]
    ActionFailed { action: String },

    #[error("Device not found: {serial_no}")]
    DeviceNotFound { serial_no: String },

    #[error("No image available from camera {serial_no}")]
    ImageUnavailable { serial_no: String },

    // ── Wrapped ──────────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn update_failed(message: impl Into<String>) -> Self {
        Self::UpdateFailed {
            message: message.into(),
        }
    }
}

impl From<sectorly_api::Error> for CoreError {
    fn from(err: sectorly_api::Error) -> Self {
        match err {
            sectorly_api::Error::Authentication { message, .. } => {
                CoreError::AuthenticationFailed { message }
            }
            sectorly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sectorly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            sectorly_api::Error::Tls(message) => CoreError::Config { message },
            other => CoreError::Api {
                message: other.to_string(),
            },
        }
    }
}
