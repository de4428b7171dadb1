use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Image,
    Video,
    Document,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Document => "document",
        }
    }
}

crate::impl_field_value!(AssetKind);

/// A file in the digital asset library. Listed alphabetically by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "assets", sort = "name")]
pub struct DigitalAsset {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(search)]
    pub name: String,
    #[record(filter = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    #[record(search)]
    pub tags: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    #[record(sortable)]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl DigitalAsset {
    pub fn new(name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            kind,
            tags: String::new(),
            url: None,
            size_bytes: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Validate for DigitalAsset {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 200)
            .max_len("tags", &self.tags, 500)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filterable, SortKey, SortOrder};

    #[test]
    fn sorted_by_name_by_default() {
        assert_eq!(DigitalAsset::default_sort(), SortOrder::ascending("name"));

        let mut asset = DigitalAsset::new("Banner", AssetKind::Image);
        asset.size_bytes = 2048;
        assert_eq!(asset.sort_key("name"), Some(SortKey::Text("banner".into())));
        assert_eq!(asset.sort_key("sizeBytes"), Some(SortKey::Number(2048)));
    }
}
