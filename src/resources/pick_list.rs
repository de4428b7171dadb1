use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStatus {
    #[default]
    Open,
    Picking,
    Packed,
    Shipped,
}

impl PickStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickStatus::Open => "open",
            PickStatus::Picking => "picking",
            PickStatus::Packed => "packed",
            PickStatus::Shipped => "shipped",
        }
    }
}

crate::impl_field_value!(PickStatus);

/// A warehouse pick list in the pick-pack-ship flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "pick_lists")]
pub struct PickList {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(search, unique)]
    pub order_number: String,
    #[serde(default)]
    #[record(search, filter = "assignee")]
    pub assigned_to: String,
    #[serde(default)]
    #[record(filter)]
    pub status: PickStatus,
    #[record(sortable)]
    pub item_count: u32,
    #[serde(default)]
    #[record(filter)]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl PickList {
    pub fn new(order_number: impl Into<String>, item_count: u32) -> Self {
        Self {
            id: String::new(),
            order_number: order_number.into(),
            assigned_to: String::new(),
            status: PickStatus::default(),
            item_count,
            priority: 3,
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Validate for PickList {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("orderNumber", &self.order_number)
            .range("itemCount", self.item_count, 1, 999)
            .range("priority", self.priority, 1, 5)
            .check(
                self.status != PickStatus::Open && self.assigned_to.trim().is_empty(),
                "assignedTo",
                "is required once picking starts",
            )
            .finish()
    }
}
