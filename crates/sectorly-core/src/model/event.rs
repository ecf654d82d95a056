use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One lock event as kept in [`GroupedEvents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub time: String,
    pub user: String,
    pub channel: String,
}

/// Events by lock serial, then by event type, in source order.
pub type GroupedEvents = IndexMap<String, IndexMap<String, Vec<EventRecord>>>;

/// Raw log row from the panel log endpoint.
///
/// Scalar fields are kept as text whatever their JSON type; arrays and
/// objects read as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LogEntry {
    #[serde(deserialize_with = "scalar_string")]
    pub lock_name: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub event_type: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub time: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub user: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub channel: Option<String>,
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}
