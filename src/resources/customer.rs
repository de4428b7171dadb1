use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Lead => "lead",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[default]
    Retail,
    Wholesale,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Retail => "retail",
            CustomerType::Wholesale => "wholesale",
        }
    }
}

crate::impl_field_value!(CustomerStatus, CustomerType);

/// A customer account. Email addresses are unique across customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "customers")]
pub struct Customer {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(search)]
    pub first_name: String,
    #[record(search)]
    pub last_name: String,
    #[record(search, unique)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[record(search)]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    #[record(filter)]
    pub status: CustomerStatus,
    #[serde(default)]
    #[record(filter = "type")]
    pub customer_type: CustomerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Customer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            company: None,
            postal_code: None,
            status: CustomerStatus::default(),
            customer_type: CustomerType::default(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Validate for Customer {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("firstName", &self.first_name)
            .max_len("firstName", &self.first_name, 50)
            .required("lastName", &self.last_name)
            .max_len("lastName", &self.last_name, 50)
            .email("email", &self.email)
            .optional_phone("phone", self.phone.as_deref())
            .optional_postal_code("postalCode", self.postal_code.as_deref())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filterable, HasId};

    #[test]
    fn accepts_numeric_ids_and_missing_optionals() {
        let json = r#"{
            "id": 42,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "customerType": "wholesale",
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;
        let customer: Customer = serde_json::from_str(json).unwrap();

        assert_eq!(customer.id(), "42");
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.filter_value("type").as_deref(), Some("wholesale"));
        assert!(customer.phone.is_none());
    }

    #[test]
    fn new_customer_serializes_without_id() {
        let value = serde_json::to_value(Customer::new("Ada", "Lovelace", "ada@example.com")).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["status"], "active");
    }

    #[test]
    fn validation_covers_contact_fields() {
        let mut customer = Customer::new("Ada", "", "ada@example.com");
        customer.phone = Some("12".into());
        customer.postal_code = Some("nope".into());

        let errors = customer.validate().unwrap_err();
        assert!(errors.has("lastName"));
        assert!(errors.has("phone"));
        assert!(errors.has("postalCode"));
        assert!(!errors.has("email"));
    }
}
