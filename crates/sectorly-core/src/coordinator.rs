// ── Update coordinator ──
//
// Drives the periodic fetch-and-normalize cycle for one panel and
// publishes each result as an immutable snapshot. Actions go through the
// coordinator so a successful one can trigger an immediate refresh.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use sectorly_api::{ArmMode, SectorClient};
use serde_json::{Value, json};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::PanelConfig;
use crate::error::CoreError;
use crate::model::{Device, Devices, GroupedEvents, Snapshot};
use crate::normalize::{group_event_logs, process_devices};

/// Entry point for hosts.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Readers take the current
/// snapshot without blocking the refresh; at most one cycle runs at a time.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: PanelConfig,
    client: SectorClient,
    snapshot: ArcSwapOption<Snapshot>,
    updates: watch::Sender<Option<Arc<Snapshot>>>,
    last_error: ArcSwapOption<String>,
    cycle: Mutex<()>,
}

impl Coordinator {
    /// Build the client from `config`. Does not contact the API.
    pub fn new(config: PanelConfig) -> Result<Self, CoreError> {
        let client = SectorClient::new(
            &config.base_url,
            config.credentials.clone(),
            config.panel_id.clone(),
            config.fetch,
            &config.transport,
        )?;
        Ok(Self::with_client(config, client))
    }

    /// Wrap an already-built client (custom retry policy, test servers).
    pub fn with_client(config: PanelConfig, client: SectorClient) -> Self {
        debug!(panel_id = %config.panel_id, fetch = ?config.fetch, "coordinator created");
        let (updates, _) = watch::channel(None);
        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                snapshot: ArcSwapOption::empty(),
                updates,
                last_error: ArcSwapOption::empty(),
                cycle: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &SectorClient {
        &self.inner.client
    }

    // ── Update cycle ─────────────────────────────────────────────────

    /// Run one update cycle and publish the result.
    ///
    /// On failure the previous snapshot stays published and the error
    /// carries the underlying message. An authentication failure also
    /// drops the session so the next cycle logs in from scratch.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.inner.cycle.lock().await;

        let result = match self.inner.config.cycle_timeout {
            Some(limit) => tokio::time::timeout(limit, self.update_cycle())
                .await
                .unwrap_or_else(|_| {
                    Err(CoreError::Timeout {
                        timeout_secs: limit.as_secs(),
                    })
                }),
            None => self.update_cycle().await,
        };

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.store(Some(Arc::clone(&snapshot)));
                self.inner.updates.send_replace(Some(Arc::clone(&snapshot)));
                self.inner.last_error.store(None);
                debug!(
                    devices = snapshot.devices.len(),
                    locks_with_events = snapshot.logs.len(),
                    "data refresh complete"
                );
                Ok(snapshot)
            }
            Err(CoreError::AuthenticationFailed { message }) => {
                error!(error = %message, "authentication failed, will retry on next update");
                self.inner.client.clear_session();
                Err(self.record_failure(format!("Authentication failed: {message}")))
            }
            Err(err) => {
                error!(error = %err, "failed to update data");
                Err(self.record_failure(format!("Failed to update data: {err}")))
            }
        }
    }

    async fn update_cycle(&self) -> Result<Snapshot, CoreError> {
        let client = &self.inner.client;
        client.ensure_authenticated().await?;
        let api_data = client.retrieve_all_data().await?;
        debug!(endpoints = ?api_data.keys().collect::<Vec<_>>(), "api data retrieved");

        let (devices, panel_status) = process_devices(&api_data);
        let logs = api_data
            .get(sectorly_api::DataEndpoint::Logs.display_name())
            .map(|logs| group_event_logs(logs, &devices))
            .unwrap_or_default();

        Ok(Snapshot {
            devices,
            panel_status,
            logs,
            refreshed_at: Utc::now(),
        })
    }

    fn record_failure(&self, message: String) -> CoreError {
        self.inner.last_error.store(Some(Arc::new(message.clone())));
        CoreError::update_failed(message)
    }

    /// Refresh every `update_interval` until `cancel` fires. The first
    /// cycle runs immediately; failures are logged and the loop carries on.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.inner.config.update_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.inner.config.update_interval.as_secs(),
            "starting update loop"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "periodic refresh failed");
                    }
                }
            }
        }
        debug!("update loop stopped");
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run(cancel).await })
    }

    // ── Published state ──────────────────────────────────────────────

    /// Latest published snapshot, if any cycle has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.load_full()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.inner.updates.subscribe()
    }

    /// Most recently grouped lock events.
    pub fn process_events(&self) -> GroupedEvents {
        self.snapshot().map(|s| s.logs.clone()).unwrap_or_default()
    }

    pub fn devices(&self) -> Devices {
        self.snapshot().map(|s| s.devices.clone()).unwrap_or_default()
    }

    /// Message of the last failed cycle, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error.load_full().map(|e| e.as_ref().clone())
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// A code is valid iff it has exactly `code_format` characters.
    pub fn validate_code(&self, code: &SecretString) -> Result<(), CoreError> {
        let expected = self.inner.config.code_format;
        if code.expose_secret().chars().count() == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidCode { expected })
        }
    }

    pub async fn arm(&self, mode: ArmMode, code: &SecretString) -> Result<(), CoreError> {
        self.validate_code(code)?;
        let ok = self.inner.client.arm_system(mode, code).await;
        self.finish_action(ok, &format!("arm ({mode})")).await
    }

    pub async fn disarm(&self, code: &SecretString) -> Result<(), CoreError> {
        self.validate_code(code)?;
        let ok = self.inner.client.disarm_system(code).await;
        self.finish_action(ok, "disarm").await
    }

    /// Once a snapshot exists, lock actions only target locks it lists.
    fn ensure_known_lock(&self, serial_no: &str) -> Result<(), CoreError> {
        match self.snapshot() {
            Some(snapshot) if !snapshot.devices.get(serial_no).is_some_and(Device::is_lock) => {
                Err(CoreError::DeviceNotFound {
                    serial_no: serial_no.to_owned(),
                })
            }
            _ => Ok(()),
        }
    }

    pub async fn lock(&self, serial_no: &str, code: &SecretString) -> Result<(), CoreError> {
        self.validate_code(code)?;
        self.ensure_known_lock(serial_no)?;
        let ok = self.inner.client.lock_door(serial_no, code).await;
        self.finish_action(ok, &format!("lock {serial_no}")).await
    }

    pub async fn unlock(&self, serial_no: &str, code: &SecretString) -> Result<(), CoreError> {
        self.validate_code(code)?;
        self.ensure_known_lock(serial_no)?;
        let ok = self.inner.client.unlock_door(serial_no, code).await;
        self.finish_action(ok, &format!("unlock {serial_no}")).await
    }

    pub async fn set_smartplug(&self, plug_id: &str, on: bool) -> Result<(), CoreError> {
        let ok = if on {
            self.inner.client.turn_on_smartplug(plug_id).await
        } else {
            self.inner.client.turn_off_smartplug(plug_id).await
        };
        let state = if on { "on" } else { "off" };
        self.finish_action(ok, &format!("turn {state} smart plug {plug_id}"))
            .await
    }

    /// A successful action triggers an immediate refresh. A failed refresh
    /// does not fail the action.
    async fn finish_action(&self, ok: bool, action: &str) -> Result<(), CoreError> {
        if !ok {
            return Err(CoreError::ActionFailed {
                action: action.to_owned(),
            });
        }
        info!(action, "action succeeded, refreshing");
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refresh after action failed");
        }
        Ok(())
    }

    pub async fn camera_image(&self, serial_no: &str) -> Result<Vec<u8>, CoreError> {
        self.inner
            .client
            .get_camera_image(serial_no)
            .await
            .ok_or_else(|| CoreError::ImageUnavailable {
                serial_no: serial_no.to_owned(),
            })
    }

    /// Panels visible to the account, `PanelId → DisplayName`.
    pub async fn panels(&self) -> IndexMap<String, String> {
        self.inner.client.get_panel_list().await
    }

    pub fn logout(&self) {
        self.inner.client.logout();
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Current snapshot plus configuration, with secrets left out.
    pub fn diagnostics(&self) -> Value {
        let config = &self.inner.config;
        let session = self.inner.client.session_state();
        json!({
            "config": {
                "api_url": config.base_url.as_str(),
                "email": config.credentials.email,
                "password": "**REDACTED**",
                "panel_id": config.panel_id,
                "fetch": config.fetch,
                "code_format": config.code_format,
                "update_interval_secs": config.update_interval.as_secs(),
                "cycle_timeout_secs": config.cycle_timeout.map(|t| t.as_secs()),
            },
            "session": {
                "authenticated": session.is_valid(),
                "expires_at": session.expires_at(),
            },
            "last_error": self.last_error(),
            "data": self.snapshot().as_deref(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn coordinator(code_format: usize) -> Coordinator {
        let mut config = PanelConfig::new(
            "user@example.com",
            SecretString::from("hunter2".to_string()),
            "12345",
        )
        .unwrap();
        config.code_format = code_format;
        Coordinator::new(config).unwrap()
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn code_length_must_match_format() {
        let c = coordinator(6);
        assert!(c.validate_code(&secret("123456")).is_ok());
        assert!(matches!(
            c.validate_code(&secret("1234")),
            Err(CoreError::InvalidCode { expected: 6 })
        ));
        assert!(c.validate_code(&secret("")).is_err());
        assert!(coordinator(4).validate_code(&secret("1234")).is_ok());
    }

    #[tokio::test]
    async fn invalid_code_never_reaches_the_api() {
        // No server behind the default URL is contacted: validation fails first.
        let c = coordinator(6);
        let err = c.arm(ArmMode::Total, &secret("12")).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCode { .. }));
    }

    #[test]
    fn nothing_published_before_first_refresh() {
        let c = coordinator(6);
        assert!(c.snapshot().is_none());
        assert!(c.process_events().is_empty());
        assert!(c.devices().is_empty());
        assert!(c.subscribe().borrow().is_none());
    }

    #[test]
    fn diagnostics_redact_password() {
        let c = coordinator(6);
        let diag = c.diagnostics();
        assert_eq!(diag["config"]["password"], "**REDACTED**");
        assert_eq!(diag["config"]["panel_id"], "12345");
        assert!(!diag.to_string().contains("hunter2"));
        assert_eq!(diag["data"], Value::Null);
    }
}
