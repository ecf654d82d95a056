use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Model label assigned to every device sourced from the lock-status list.
pub const SMART_LOCK_MODEL: &str = "Smart Lock";

/// Semantic sensor kinds a device may expose.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorKey {
    Closed,
    LowBattery,
    Alarm,
    Temperature,
    Humidity,
    LockStatus,
}

/// A coerced sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Bool(bool),
    Float(f64),
    Text(String),
}

impl SensorValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Sensor readings of one device, ordered by key.
pub type Sensors = BTreeMap<SensorKey, SensorValue>;

/// One normalized device, keyed by its serial number in [`Devices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: Option<String>,
    pub serial_no: String,
    pub sensors: Sensors,
    pub model: String,
    /// Raw component `Type` as reported by the API.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl Device {
    pub fn sensor(&self, key: SensorKey) -> Option<&SensorValue> {
        self.sensors.get(&key)
    }

    pub fn is_lock(&self) -> bool {
        self.model == SMART_LOCK_MODEL
    }

    /// `true` when the lock reports the `lock` state.
    pub fn is_locked(&self) -> bool {
        self.sensor(SensorKey::LockStatus)
            .and_then(SensorValue::as_text)
            .is_some_and(|s| s == "lock")
    }

    /// Name for display, falling back to the serial number.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.serial_no)
    }
}

/// Device registry keyed by serial number, in discovery order.
pub type Devices = IndexMap<String, Device>;
