use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Arming state derived from the panel's numeric `Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmState {
    Disarmed,
    ArmedHome,
    ArmedAway,
    Unknown,
}

impl AlarmState {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Disarmed,
            2 => Self::ArmedHome,
            3 => Self::ArmedAway,
            _ => Self::Unknown,
        }
    }
}

/// Raw panel-status object, passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelStatus(pub Value);

impl PanelStatus {
    /// `None` while the panel reports itself offline.
    pub fn alarm_state(&self) -> Option<AlarmState> {
        if self.0.get("IsOnline").and_then(Value::as_bool) == Some(false) {
            return None;
        }
        let code = self.0.get("Status").and_then(Value::as_i64).unwrap_or(0);
        Some(AlarmState::from_code(code))
    }

    pub fn is_online(&self) -> bool {
        self.0.get("IsOnline").and_then(Value::as_bool).unwrap_or(true)
    }

    pub fn serial_no(&self) -> Option<&str> {
        self.0.get("SerialNo").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }
}
