use thiserror::Error;

/// Top-level error type for the `sectorly-api` crate.
///
/// Two tiers matter to callers: [`Authentication`](Self::Authentication)
/// is never retried and forces a fresh login, while transport failures
/// are retried by [`retry_with_backoff`](crate::retry::retry_with_backoff).
/// Soft failures (non-200 status, non-JSON body) are not errors at all;
/// request helpers report them as `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, token expired, or the login call itself failed.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Authentication error without an underlying transport cause.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Authentication error wrapping the transport failure that caused it.
    pub fn auth_with(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Authentication {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Classify a failed `send()`: reqwest timeouts become
    /// [`Timeout`](Self::Timeout), everything else stays a transport error.
    pub fn from_send(err: reqwest::Error, timeout: std::time::Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout_secs: timeout.as_secs(),
            }
        } else {
            Self::Transport(err)
        }
    }

    /// Returns `true` for authentication failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}
