// Lock-status list → Smart Lock devices.

use serde_json::Value;
use tracing::{debug, warn};

use super::components::scalar_text;
use super::sensors::{LOCK_SENSORS, apply_sensors};
use crate::model::{Device, Devices, SMART_LOCK_MODEL, Sensors};

/// Insert one Smart Lock device per item, replacing any existing entry
/// with the same serial. Items without a serial are dropped.
pub fn process_locks(items: &[Value], devices: &mut Devices) {
    for item in items {
        let Some(lock) = item.as_object() else {
            warn!(?item, "lock item is not an object");
            continue;
        };
        let Some(serial_no) = lock
            .get("Serial")
            .and_then(scalar_text)
            .filter(|s| !s.is_empty())
        else {
            warn!(?lock, "lock missing Serial");
            continue;
        };

        let mut sensors = Sensors::new();
        apply_sensors(&mut sensors, lock, LOCK_SENSORS);

        let device = Device {
            name: lock.get("Label").and_then(scalar_text),
            serial_no: serial_no.clone(),
            sensors,
            model: SMART_LOCK_MODEL.to_owned(),
            device_type: None,
        };
        debug!(serial_no, ?device, "processed lock");
        devices.insert(serial_no, device);
    }
}
