use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;
use crate::store::StoreError;

/// A partial update: serialized field name to new value.
///
/// Sent as the body of `PATCH /{resource}/{id}` by the HTTP store and merged
/// into the stored record by the local store. Keys use the record's serialized
/// field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch(Map<String, Value>);

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a JSON-convertible value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Set a field to any serializable value (enums, nested structs).
    pub fn set_serialized<V: Serialize>(
        mut self,
        field: impl Into<String>,
        value: &V,
    ) -> Result<Self, StoreError> {
        self.0.insert(field.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Build the patch that turns `original` into `edited`.
    ///
    /// Only top-level fields whose serialized value changed are included;
    /// fields missing from `edited` are set to `null`.
    pub fn diff<R: Serialize>(original: &R, edited: &R) -> Result<Self, StoreError> {
        let before = to_object(original)?;
        let after = to_object(edited)?;

        let mut changes = Map::new();
        for (key, value) in &after {
            if before.get(key) != Some(value) {
                changes.insert(key.clone(), value.clone());
            }
        }
        for key in before.keys() {
            if !after.contains_key(key) {
                changes.insert(key.clone(), Value::Null);
            }
        }

        Ok(Self(changes))
    }

    /// Merge this patch into `record`, producing the updated record.
    ///
    /// The record keeps its id even if the patch names the id field.
    pub fn apply<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        let mut merged = to_object(record)?;
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }

        let mut updated: R = serde_json::from_value(Value::Object(merged))?;
        updated.set_id(record.id().to_string());
        Ok(updated)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn to_object<R: Serialize>(record: &R) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serde(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
