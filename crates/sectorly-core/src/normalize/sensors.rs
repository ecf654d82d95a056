// Typed sensor parsers.
//
// Each sensor kind declares its source-field aliases and a parser. The
// first alias present in the component decides; if its value does not
// parse, the sensor is left out and the others carry on.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::{SensorKey, SensorValue, Sensors};

/// How a raw field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Bool,
    Float,
    Text,
}

/// Declarative sensor source: semantic key, field aliases in priority order, parser.
#[derive(Debug, Clone, Copy)]
pub struct SensorSpec {
    pub key: SensorKey,
    pub aliases: &'static [&'static str],
    pub kind: SensorKind,
}

/// Sensors read from every `Sections → Places → Components` component.
pub const COMPONENT_SENSORS: &[SensorSpec] = &[
    SensorSpec { key: SensorKey::Closed, aliases: &["Closed"], kind: SensorKind::Bool },
    SensorSpec {
        key: SensorKey::LowBattery,
        aliases: &["LowBattery", "BatteryLow"],
        kind: SensorKind::Bool,
    },
    SensorSpec { key: SensorKey::Alarm, aliases: &["Alarm"], kind: SensorKind::Bool },
    SensorSpec { key: SensorKey::Temperature, aliases: &["Temperature"], kind: SensorKind::Float },
    SensorSpec { key: SensorKey::Humidity, aliases: &["Humidity"], kind: SensorKind::Float },
];

/// Sensors read from each lock-status item.
pub const LOCK_SENSORS: &[SensorSpec] = &[
    SensorSpec { key: SensorKey::LockStatus, aliases: &["Status"], kind: SensorKind::Text },
    SensorSpec { key: SensorKey::LowBattery, aliases: &["BatteryLow"], kind: SensorKind::Bool },
];

/// Parse a boolean: JSON bools, numbers (non-zero is true), and the
/// strings `true/false/1/0/yes/no` in any case.
pub fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse a float from a JSON number or a numeric string.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Parse free text. Numbers are rendered; other shapes are rejected.
pub fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl SensorKind {
    pub fn parse(self, value: &Value) -> Option<SensorValue> {
        match self {
            Self::Bool => parse_bool(value).map(SensorValue::Bool),
            Self::Float => parse_float(value).map(SensorValue::Float),
            Self::Text => parse_text(value).map(SensorValue::Text),
        }
    }
}

/// Resolve one sensor from `component` into `sensors`.
///
/// Returns `true` if a value was stored.
pub fn apply_sensor(sensors: &mut Sensors, component: &Map<String, Value>, spec: &SensorSpec) -> bool {
    let Some((field, raw)) = spec
        .aliases
        .iter()
        .find_map(|alias| component.get(*alias).map(|v| (*alias, v)))
    else {
        debug!(sensor = %spec.key, aliases = ?spec.aliases, "sensor fields not present");
        return false;
    };

    match spec.kind.parse(raw) {
        Some(value) => {
            debug!(sensor = %spec.key, %value, "sensor added");
            sensors.insert(spec.key, value);
            true
        }
        None => {
            warn!(sensor = %spec.key, field, value = %raw, "failed to parse sensor value");
            false
        }
    }
}

/// Apply every spec in `specs`, merging into existing readings.
pub fn apply_sensors(sensors: &mut Sensors, component: &Map<String, Value>, specs: &[SensorSpec]) {
    for spec in specs {
        apply_sensor(sensors, component, spec);
    }
}
