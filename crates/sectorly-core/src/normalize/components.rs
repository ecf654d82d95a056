// Sections → Places → Components walk for category payloads.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::model_for;
use super::sensors::{COMPONENT_SENSORS, apply_sensors};
use crate::model::{Device, Devices, Sensors};

/// Walk one category payload and create or update a device per component.
///
/// Payloads without a `Sections` array are skipped.
pub fn process_category(category: &str, data: &Value, devices: &mut Devices) {
    let Some(sections) = data.get("Sections").and_then(Value::as_array) else {
        debug!(category, "category does not contain Sections");
        return;
    };

    let default_model = model_for(category).unwrap_or(category);

    let components = sections
        .iter()
        .flat_map(|section| children(section, "Places"))
        .flat_map(|place| children(place, "Components"));

    for component in components {
        let Some(component) = component.as_object() else {
            warn!(category, ?component, "component is not an object");
            continue;
        };
        let Some(serial_no) = component_serial(component) else {
            warn!(category, ?component, "component missing SerialNo/Serial");
            continue;
        };

        let device_type = component.get("Type").and_then(scalar_text);
        let model = device_type
            .as_deref()
            .and_then(model_for)
            .unwrap_or(default_model);

        let device = devices.entry(serial_no.clone()).or_insert_with(|| Device {
            name: text_field(component, "Label").or_else(|| text_field(component, "Name")),
            serial_no: serial_no.clone(),
            sensors: Sensors::new(),
            model: model.to_owned(),
            device_type: device_type.clone(),
        });
        apply_sensors(&mut device.sensors, component, COMPONENT_SENSORS);

        debug!(
            serial_no,
            model,
            category,
            device_type = device_type.as_deref().unwrap_or_default(),
            "processed device"
        );
    }
}

/// `SerialNo`, then `Serial`. Empty or non-scalar values do not count.
fn component_serial(component: &Map<String, Value>) -> Option<String> {
    ["SerialNo", "Serial"]
        .iter()
        .filter_map(|key| component.get(*key).and_then(scalar_text))
        .find(|s| !s.is_empty())
}

fn children<'a>(node: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
    node.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn text_field(component: &Map<String, Value>, key: &str) -> Option<String> {
    component
        .get(key)
        .and_then(scalar_text)
        .filter(|s| !s.is_empty())
}

/// Strings verbatim; numbers rendered. Everything else is `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
