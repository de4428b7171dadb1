use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

/// Which accounting-system entity a mapping applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingEntity {
    #[default]
    Customer,
    Invoice,
    Product,
    Payment,
}

impl MappingEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingEntity::Customer => "customer",
            MappingEntity::Invoice => "invoice",
            MappingEntity::Product => "product",
            MappingEntity::Payment => "payment",
        }
    }
}

crate::impl_field_value!(MappingEntity);

/// Maps a console field to a field of the external accounting system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "field_mappings")]
pub struct FieldMapping {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(search)]
    pub source_field: String,
    #[record(search)]
    pub target_field: String,
    #[record(filter)]
    pub entity: MappingEntity,
    /// Optional transform applied while syncing, e.g. `"uppercase"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    #[serde(default = "enabled")]
    #[record(filter = "active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

fn enabled() -> bool {
    true
}

impl FieldMapping {
    pub fn new(
        source_field: impl Into<String>,
        target_field: impl Into<String>,
        entity: MappingEntity,
    ) -> Self {
        Self {
            id: String::new(),
            source_field: source_field.into(),
            target_field: target_field.into(),
            entity,
            transform: None,
            active: true,
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Validate for FieldMapping {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("sourceField", &self.source_field)
            .max_len("sourceField", &self.source_field, 100)
            .required("targetField", &self.target_field)
            .max_len("targetField", &self.target_field, 100)
            .check(
                !self.source_field.trim().is_empty()
                    && self.source_field.trim() == self.target_field.trim(),
                "targetField",
                "must differ from the source field",
            )
            .finish()
    }
}
