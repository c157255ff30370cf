//! Tracker annotations supplied by the external detector.

use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// One claim that an entry sent `property = value` to an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transmission {
    #[serde(rename = "adapter", alias = "adapterId")]
    pub adapter_id: String,
    pub property: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Transmission {
    pub fn new(
        adapter_id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Annotation slot for one archive entry; `None` means no detection ran or
/// nothing was found.
pub type AnnotationSlot = Option<Vec<Transmission>>;

/// Parse the detector output: a JSON array with one slot per archive entry.
pub fn parse_annotations(json: &str) -> Result<Vec<AnnotationSlot>> {
    Ok(serde_json::from_str(json)?)
}

// Detectors occasionally emit numeric or boolean values.
fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}
