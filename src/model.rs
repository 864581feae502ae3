use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A person record from the directory server. Everything except the id is
/// optional; the views substitute placeholders for missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n,
            _ => "Unnamed",
        }
    }
}

// Some deployments send numeric ids, others strings. Normalize to String.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}

/// Peel the `data` envelope if present (and not null), otherwise keep the
/// body as-is. The server contract is undocumented on this point.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(v) if !v.is_null() => v,
            _ => Value::Object(map),
        },
        other => other,
    }
}

/// Decode a page response. Accepted shapes:
/// a bare array, `{"data": [...]}`, and `{"data": {"items": [...]}}`.
/// Anything else decodes to an empty page rather than an error.
pub fn profiles_from_value(body: Value) -> Vec<Profile> {
    let data = unwrap_data(body);
    let raw = match data {
        Value::Array(list) => list,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(list)) => list,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    raw.into_iter()
        .filter_map(|v| serde_json::from_value::<Profile>(v).ok())
        .collect()
}

/// Decode a detail response (`{"data": {...}}` or a bare object).
/// Returns None when the body holds no usable record.
pub fn profile_from_value(body: Value) -> Option<Profile> {
    serde_json::from_value(unwrap_data(body)).ok()
}
