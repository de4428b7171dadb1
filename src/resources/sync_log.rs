use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::MappingEntity;
use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Success => "success",
            SyncStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    #[default]
    Push,
    Pull,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::Push => "push",
            SyncDirection::Pull => "pull",
        }
    }
}

crate::impl_field_value!(SyncStatus, SyncDirection);

/// One run of the accounting-system sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "sync_logs")]
pub struct SyncLog {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(filter)]
    pub entity: MappingEntity,
    #[record(filter)]
    pub direction: SyncDirection,
    #[serde(default)]
    #[record(filter)]
    pub status: SyncStatus,
    #[serde(default)]
    #[record(sortable)]
    pub records_processed: u32,
    #[serde(default)]
    #[record(search)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl SyncLog {
    pub fn new(entity: MappingEntity, direction: SyncDirection) -> Self {
        Self {
            id: String::new(),
            entity,
            direction,
            status: SyncStatus::default(),
            records_processed: 0,
            message: String::new(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Validate for SyncLog {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .check(
                self.status == SyncStatus::Failed && self.message.trim().is_empty(),
                "message",
                "is required for failed runs",
            )
            .max_len("message", &self.message, 1000)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_run_needs_a_message() {
        let mut log = SyncLog::new(MappingEntity::Invoice, SyncDirection::Push);
        assert!(log.validate().is_ok());

        log.status = SyncStatus::Failed;
        assert!(log.validate().unwrap_err().has("message"));

        log.message = "QuickBooks rejected 2 invoices".into();
        assert!(log.validate().is_ok());
    }
}
