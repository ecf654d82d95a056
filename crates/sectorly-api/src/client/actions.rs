// Write-side endpoints: arming, locks, smart plugs, camera snapshots.
//
// Every action reports plain success/failure. Errors are logged here and
// never surface to the caller.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{Display, EnumString};
use tracing::{debug, error, warn};

use crate::client::SectorClient;
use crate::endpoints::ActionEndpoint;
use crate::error::Error;
use crate::retry::retry_with_backoff;

/// Arming mode. `total` maps to the Arm endpoint, `partial` to PartialArm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArmMode {
    Total,
    Partial,
}

impl ArmMode {
    fn endpoint(self) -> ActionEndpoint {
        match self {
            Self::Total => ActionEndpoint::Arm,
            Self::Partial => ActionEndpoint::PartialArm,
        }
    }
}

impl SectorClient {
    /// Arm the panel in the given mode.
    pub async fn arm_system(&self, mode: ArmMode, code: &SecretString) -> bool {
        let payload = json!({
            "PanelCode": code.expose_secret(),
            "PanelId": self.panel_id,
        });
        self.perform_action(mode.endpoint(), &payload, "arm system")
            .await
    }

    pub async fn disarm_system(&self, code: &SecretString) -> bool {
        let payload = json!({
            "PanelCode": code.expose_secret(),
            "PanelId": self.panel_id,
        });
        self.perform_action(ActionEndpoint::Disarm, &payload, "disarm system")
            .await
    }

    pub async fn lock_door(&self, serial_no: &str, code: &SecretString) -> bool {
        let payload = lock_payload(&self.panel_id, serial_no, code);
        self.perform_action(ActionEndpoint::Lock, &payload, &format!("lock door {serial_no}"))
            .await
    }

    pub async fn unlock_door(&self, serial_no: &str, code: &SecretString) -> bool {
        let payload = lock_payload(&self.panel_id, serial_no, code);
        self.perform_action(
            ActionEndpoint::Unlock,
            &payload,
            &format!("unlock door {serial_no}"),
        )
        .await
    }

    pub async fn turn_on_smartplug(&self, plug_id: &str) -> bool {
        let payload = json!({ "PanelId": self.panel_id, "SmartplugId": plug_id });
        self.perform_action(
            ActionEndpoint::TurnOnSmartplug,
            &payload,
            &format!("turn on smart plug {plug_id}"),
        )
        .await
    }

    pub async fn turn_off_smartplug(&self, plug_id: &str) -> bool {
        let payload = json!({ "PanelId": self.panel_id, "SmartplugId": plug_id });
        self.perform_action(
            ActionEndpoint::TurnOffSmartplug,
            &payload,
            &format!("turn off smart plug {plug_id}"),
        )
        .await
    }

    /// Fetch the latest still image from a camera.
    ///
    /// `POST /api/panel/GetCameraImage` with `{PanelId, CameraId}`. Uses the
    /// longer image timeout and is not retried. Returns `None` on any failure.
    pub async fn get_camera_image(&self, serial_no: &str) -> Option<Vec<u8>> {
        match self.fetch_camera_image(serial_no).await {
            Ok(image) => image,
            Err(err) => {
                error!(camera = serial_no, error = %err, "error while retrieving camera image");
                None
            }
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────

    async fn perform_action(&self, action: ActionEndpoint, payload: &Value, what: &str) -> bool {
        match self.try_action(action, payload).await {
            Ok(true) => {
                debug!(action = %action, "{what}: succeeded");
                true
            }
            Ok(false) => {
                error!(action = %action, "failed to {what}");
                false
            }
            Err(err) => {
                error!(action = %action, error = %err, "error while trying to {what}");
                false
            }
        }
    }

    /// `Ok(true)` iff the endpoint answered with a non-null JSON body.
    async fn try_action(&self, action: ActionEndpoint, payload: &Value) -> Result<bool, Error> {
        let Some(ep) = self.endpoints.action(action) else {
            return Ok(false);
        };
        self.ensure_authenticated().await?;
        let body = retry_with_backoff(&self.retry, || self.post(&ep.url, payload)).await?;
        Ok(body.is_some_and(|b| !b.is_null()))
    }

    async fn fetch_camera_image(&self, serial_no: &str) -> Result<Option<Vec<u8>>, Error> {
        self.ensure_authenticated().await?;

        let url = self.endpoints.camera_image_url();
        debug!(%url, camera = serial_no, "POST camera image");
        let payload = json!({ "PanelId": self.panel_id, "CameraId": serial_no });
        let resp = self
            .authorize(self.http.post(url.clone()))
            .json(&payload)
            .timeout(self.image_timeout)
            .send()
            .await
            .map_err(|e| Error::from_send(e, self.image_timeout))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("authorization token expired, will re-authenticate");
            self.clear_session();
            return Err(Error::auth("token expired"));
        }
        if status != StatusCode::OK {
            error!(%status, "failed to get camera image");
            return Ok(None);
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        if !is_image(&content_type) {
            error!(%content_type, "received unexpected content type");
            return Ok(None);
        }

        Ok(Some(resp.bytes().await?.to_vec()))
    }
}

fn lock_payload(panel_id: &str, serial_no: &str, code: &SecretString) -> Value {
    json!({
        "LockSerial": serial_no,
        "PanelCode": code.expose_secret(),
        "PanelId": panel_id,
        "SerialNo": serial_no,
    })
}

fn is_image(content_type: &str) -> bool {
    content_type.contains("image/") || content_type.contains("application/octet-stream")
}
