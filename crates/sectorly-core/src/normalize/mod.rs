// Normalization pipeline
//
// Flattens one cycle of raw endpoint bodies into the device registry,
// passes the panel status through, and groups lock events. Pure functions
// over `ApiData`; nothing here performs I/O.

pub mod components;
pub mod locks;
pub mod logs;
pub mod sensors;

use sectorly_api::{ApiData, DataEndpoint};
use serde_json::Value;
use tracing::debug;

use crate::model::{Devices, PanelStatus};

pub use components::process_category;
pub use locks::process_locks;
pub use logs::group_event_logs;

/// Lowercased component type or category name → model label.
pub const CATEGORY_MODEL_MAPPING: &[(&str, &str)] = &[
    ("1", "Door/Window Sensor"),
    ("doors and windows", "Door/Window Sensor"),
    ("vibrationsensor", "Door/Window Sensor"),
    ("smoke detector", "Smoke Detector"),
    ("smoke detectors", "Smoke Detector"),
    ("smokedetectorsync", "Smoke Detector"),
    ("leakage detectors", "Leakage Detector"),
    ("temperatures", "Temperature Sensor"),
    ("humidity", "Humidity Sensor"),
    ("smartplug status", "Smart Plug"),
    ("lock status", "Lock"),
    ("cameras", "Camera"),
    ("camerapir", "Camera"),
    ("keypad", "Keypad"),
];

/// Look up a model label by lowercased key.
pub fn model_for(key: &str) -> Option<&'static str> {
    let key = key.to_lowercase();
    CATEGORY_MODEL_MAPPING
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, model)| *model)
}

/// Build the device registry and extract the panel status.
///
/// Categories are visited in fetch order, so a lock item replaces any
/// component sharing its serial, while components merge sensors into
/// earlier entries.
pub fn process_devices(api_data: &ApiData) -> (Devices, PanelStatus) {
    let mut devices = Devices::new();
    let panel_status = api_data
        .get(DataEndpoint::PanelStatus.display_name())
        .cloned()
        .map(PanelStatus)
        .unwrap_or_default();

    for (category, data) in api_data {
        if category == DataEndpoint::Logs.display_name()
            || category == DataEndpoint::PanelStatus.display_name()
        {
            continue;
        }
        debug!(category = %category, "processing category");
        match data {
            Value::Array(items) if category == DataEndpoint::LockStatus.display_name() => {
                process_locks(items, &mut devices);
            }
            _ => process_category(category, data, &mut devices),
        }
    }

    (devices, panel_status)
}
