// Lock event grouping.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::{Devices, EventRecord, GroupedEvents, LogEntry};

/// Group log rows by lock serial and event type, preserving source order.
///
/// Lock names are resolved through the Smart Lock devices in `devices`.
/// Rows missing a lock name, event type or time are skipped, as are rows
/// naming a lock that is not in the registry. `logs` may be the bare row
/// list or an object carrying it under `Records`.
pub fn group_event_logs(logs: &Value, devices: &Devices) -> GroupedEvents {
    let rows: &[Value] = match logs {
        Value::Array(rows) => rows,
        Value::Object(obj) => match obj.get("Records") {
            Some(Value::Array(rows)) => rows,
            _ => &[],
        },
        _ => &[],
    };
    debug!(total = rows.len(), "starting event log processing");

    let lock_names: HashMap<&str, &str> = devices
        .iter()
        .filter(|(_, device)| device.is_lock())
        .filter_map(|(serial, device)| Some((device.name.as_deref()?, serial.as_str())))
        .collect();

    let mut grouped = GroupedEvents::new();
    for row in rows {
        let entry = match LogEntry::deserialize(row) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, ?row, "skipping malformed log entry");
                continue;
            }
        };

        let (Some(lock_name), Some(event_type), Some(time)) = (
            non_empty(entry.lock_name),
            non_empty(entry.event_type),
            non_empty(entry.time),
        ) else {
            warn!(?row, "skipping invalid log entry");
            continue;
        };

        let Some(serial_no) = lock_names.get(lock_name.as_str()) else {
            debug!(lock_name, "log entry for unknown lock name, skipping");
            continue;
        };

        let record = EventRecord {
            time,
            user: entry.user.unwrap_or_default(),
            channel: entry.channel.unwrap_or_default(),
        };
        debug!(
            lock_name,
            serial_no,
            event_type,
            time = record.time,
            user = record.user,
            channel = record.channel,
            "processed log entry"
        );
        grouped
            .entry((*serial_no).to_owned())
            .or_default()
            .entry(event_type)
            .or_default()
            .push(record);
    }

    grouped
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{Device, SMART_LOCK_MODEL, Sensors};

    fn lock(serial: &str, name: &str) -> (String, Device) {
        (
            serial.to_owned(),
            Device {
                name: Some(name.to_owned()),
                serial_no: serial.to_owned(),
                sensors: Sensors::new(),
                model: SMART_LOCK_MODEL.to_owned(),
                device_type: None,
            },
        )
    }

    #[test]
    fn unknown_lock_entries_are_dropped() {
        let devices = [lock("X1", "Front Door")].into_iter().collect::<Devices>();
        let logs = json!([
            {"LockName": "Front Door", "EventType": "lock", "Time": "t1", "User": "u"},
            {"LockName": "Unknown", "EventType": "lock", "Time": "t2"}
        ]);

        let grouped = group_event_logs(&logs, &devices);

        assert_eq!(
            serde_json::to_value(&grouped).unwrap_or_default(),
            json!({"X1": {"lock": [{"time": "t1", "user": "u", "channel": ""}]}})
        );
    }

    #[test]
    fn events_keep_source_order_per_type() {
        let devices = [lock("X1", "Front Door"), lock("X2", "Back Door")]
            .into_iter()
            .collect::<Devices>();
        let logs = json!({"Records": [
            {"LockName": "Front Door", "EventType": "unlock", "Time": "t1", "Channel": "app"},
            {"LockName": "Back Door", "EventType": "lock", "Time": "t2"},
            {"LockName": "Front Door", "EventType": "lock", "Time": "t3"},
            {"LockName": "Front Door", "EventType": "unlock", "Time": "t4", "User": null},
            {"LockName": "Front Door", "EventType": "", "Time": "t5"},
            {"LockName": "Front Door", "EventType": "lock"}
        ]});

        let grouped = group_event_logs(&logs, &devices);

        let front = &grouped["X1"];
        let unlock_times: Vec<_> = front["unlock"].iter().map(|r| r.time.as_str()).collect();
        assert_eq!(unlock_times, ["t1", "t4"]);
        assert_eq!(front["unlock"][0].channel, "app");
        assert_eq!(front["lock"].len(), 1);
        assert_eq!(grouped["X2"]["lock"][0].time, "t2");
    }

    #[test]
    fn non_string_fields_are_kept_as_text() {
        let devices = [lock("X1", "Front Door")].into_iter().collect::<Devices>();
        let logs = json!([
            {"LockName": "Front Door", "EventType": "lock", "Time": "t1", "User": "u", "Channel": 2},
            {"LockName": "Front Door", "EventType": "unlock", "Time": "t2", "User": 7},
            {"LockName": "Front Door", "EventType": "lock", "Time": "t3", "User": ["x"], "Channel": true}
        ]);

        let grouped = group_event_logs(&logs, &devices);

        assert_eq!(
            serde_json::to_value(&grouped).unwrap_or_default(),
            json!({"X1": {
                "lock": [
                    {"time": "t1", "user": "u", "channel": "2"},
                    {"time": "t3", "user": "", "channel": "true"}
                ],
                "unlock": [{"time": "t2", "user": "7", "channel": ""}]
            }})
        );
    }

    #[test]
    fn only_smart_locks_are_matched() {
        let mut devices = [lock("X1", "Front Door")].into_iter().collect::<Devices>();
        if let Some(device) = devices.get_mut("X1") {
            device.model = "Door/Window Sensor".into();
        }
        let logs = json!([{"LockName": "Front Door", "EventType": "lock", "Time": "t1"}]);
        assert!(group_event_logs(&logs, &devices).is_empty());
    }

    #[test]
    fn non_list_logs_yield_nothing() {
        let devices = [lock("X1", "Front Door")].into_iter().collect::<Devices>();
        assert!(group_event_logs(&Value::Null, &devices).is_empty());
        assert!(group_event_logs(&json!("oops"), &devices).is_empty());
    }
}
