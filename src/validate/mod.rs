//! Field-level validation, run before any mutation is issued.
//!
//! ```ignore
//! impl Validate for Customer {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         Validator::new()
//!             .required("firstName", &self.first_name)
//!             .email("email", &self.email)
//!             .optional_phone("phone", self.phone.as_deref())
//!             .finish()
//!     }
//! }
//! ```

mod rules;

use std::collections::BTreeMap;
use std::fmt;

pub use rules::{is_email, is_phone, is_postal_code};

/// Field name to the messages shown next to that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-field error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Types whose field values can be checked locally.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates field errors; see the module docs.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error when `failed` is true.
    pub fn check(mut self, failed: bool, field: &str, message: &str) -> Self {
        if failed {
            self.errors.add(field, message);
        }
        self
    }

    pub fn required(self, field: &str, value: &str) -> Self {
        let failed = value.trim().is_empty();
        self.check(failed, field, "is required")
    }

    pub fn max_len(self, field: &str, value: &str, max: usize) -> Self {
        let failed = value.chars().count() > max;
        let message = format!("must be at most {max} characters");
        self.check(failed, field, &message)
    }

    /// Required and well-formed email address.
    pub fn email(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.required(field, value);
        }
        self.check(!is_email(value), field, "must be a valid email address")
    }

    pub fn optional_email(self, field: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.email(field, v),
            None => self,
        }
    }

    pub fn optional_phone(self, field: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.check(!is_phone(v), field, "must be a valid phone number"),
            None => self,
        }
    }

    pub fn optional_postal_code(self, field: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.check(!is_postal_code(v), field, "must be a valid postal code"),
            None => self,
        }
    }

    /// Inclusive numeric range.
    pub fn range<T: PartialOrd + fmt::Display>(self, field: &str, value: T, min: T, max: T) -> Self {
        let failed = value < min || value > max;
        let message = format!("must be between {min} and {max}");
        self.check(failed, field, &message)
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}
