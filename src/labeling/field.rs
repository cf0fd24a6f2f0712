use serde::{Deserialize, Serialize};

/// Class index of a character. `0` is background; field `i` (0-based, in
/// declaration order) is labelled `i + 1`.
pub type ClassId = usize;

/// Class index for characters that belong to no field.
pub const BACKGROUND: ClassId = 0;

/// One label per character of the linearized document.
pub type LabelArray = Vec<ClassId>;

/// A field name and the value it is expected to take in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub expected_value: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, expected_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expected_value: expected_value.into(),
        }
    }
}

/// Parses a key-info object such as `{"company": "...", "total": "9.00"}`.
///
/// Key order is preserved because it fixes each field's class index.
/// Non-string values are kept in their JSON rendering.
pub fn parse_key_info(json: &str) -> Result<Vec<FieldSpec>, serde_json::Error> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(object
        .into_iter()
        .map(|(name, value)| {
            let expected_value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            FieldSpec {
                name,
                expected_value,
            }
        })
        .collect())
}

/// Class id for the field at `index` in declaration order.
#[inline]
#[must_use]
pub fn class_of(index: usize) -> ClassId {
    index + 1
}
