// ── Runtime panel configuration ──
//
// Everything the coordinator needs to talk to one panel. Built by the CLI
// (or any other host) and handed in; core never reads config files.

use std::time::Duration;

use sectorly_api::{API_URL, Credentials, FetchOptions, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Default number of digits in a panel user code.
pub const DEFAULT_CODE_FORMAT: usize = 6;
/// Default interval between update cycles.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
/// Default deadline for one whole update cycle.
pub const DEFAULT_CYCLE_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for one panel.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// API root, normally [`API_URL`].
    pub base_url: Url,
    pub credentials: Credentials,
    pub panel_id: String,
    /// Which optional endpoints are polled.
    pub fetch: FetchOptions,
    /// Required length of a user code for arm/disarm/lock/unlock.
    pub code_format: usize,
    pub update_interval: Duration,
    /// Upper bound on one update cycle. `None` disables the deadline.
    pub cycle_timeout: Option<Duration>,
    pub transport: TransportConfig,
}

impl PanelConfig {
    /// Configuration against the production API with default settings.
    pub fn new(
        email: impl Into<String>,
        password: SecretString,
        panel_id: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let base_url = Url::parse(API_URL).map_err(|e| CoreError::Config {
            message: format!("invalid API URL: {e}"),
        })?;
        Ok(Self {
            base_url,
            credentials: Credentials::new(email, password),
            panel_id: panel_id.into(),
            fetch: FetchOptions::default(),
            code_format: DEFAULT_CODE_FORMAT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            cycle_timeout: Some(DEFAULT_CYCLE_TIMEOUT),
            transport: TransportConfig::default(),
        })
    }

    /// Point at a different API root (test servers, proxies).
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }
}
